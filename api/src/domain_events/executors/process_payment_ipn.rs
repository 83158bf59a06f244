use crate::config::Config;
use crate::domain_events::DomainActionExecutor;
use crate::errors::{ApiError, ApplicationError};
use crate::orders;
use diesel::PgConnection;
use gather_db::prelude::*;
use log::Level::Info;
use mercado_pago::MercadoPagoClient;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// What the webhook controller stores on the queue: just the provider's
/// payment id. The payment itself is re-fetched here so the outcome never
/// depends on unauthenticated webhook content.
#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentIpnPayload {
    pub payment_id: String,
}

pub struct ProcessPaymentIpnExecutor {
    config: Config,
}

impl ProcessPaymentIpnExecutor {
    pub fn new(config: Config) -> ProcessPaymentIpnExecutor {
        ProcessPaymentIpnExecutor { config }
    }
}

impl DomainActionExecutor for ProcessPaymentIpnExecutor {
    fn execute(&self, action: &DomainAction, conn: &mut PgConnection) -> Result<(), ApiError> {
        let payload: PaymentIpnPayload = serde_json::from_value(action.payload.clone())?;

        let client = MercadoPagoClient::new(self.config.mercado_pago_access_token.clone());
        let payment = client.get_payment(&payload.payment_id)?;

        let reference = payment
            .external_reference
            .as_deref()
            .ok_or_else(|| ApplicationError::new("Payment has no external reference".to_string()))?;
        let order_id = Uuid::from_str(reference)
            .map_err(|_| ApplicationError::new(format!("Payment reference is not an order id: {}", reference)))?;
        let order = PurchaseOrder::find(order_id, conn)?;

        jlog!(Info, "gather::domain_actions", "Processing payment notification", {
            "order_id": order_id,
            "payment_id": payment.id,
            "payment_status": &payment.status
        });

        if payment.is_approved() {
            orders::apply_payment_status(&order, PaymentStatus::Paid, &self.config, conn)?;
        }
        // Rejected or pending attempts leave the order open; the customer
        // can retry through the same preference

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips() {
        let payload = PaymentIpnPayload {
            payment_id: "1234567".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        let parsed: PaymentIpnPayload = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.payment_id, "1234567");
    }
}
