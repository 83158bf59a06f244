use crate::config::Config;
use crate::errors::{ApiError, ApplicationError};
use crate::payments::{Checkout, PaymentGateway};
use gather_db::prelude::*;
use mercado_pago::{BackUrls, CreatePreferenceRequest, MercadoPagoClient, PreferenceItem};

pub struct MercadoPagoGateway {
    client: MercadoPagoClient,
    front_end_url: String,
    notification_url: String,
}

impl MercadoPagoGateway {
    pub fn new(config: &Config) -> MercadoPagoGateway {
        MercadoPagoGateway {
            client: MercadoPagoClient::new(config.mercado_pago_access_token.clone()),
            front_end_url: config.front_end_url.clone(),
            notification_url: format!("{}/webhooks/mercadopago", config.api_base_url),
        }
    }
}

impl PaymentGateway for MercadoPagoGateway {
    fn platform(&self) -> PaymentPlatform {
        PaymentPlatform::MercadoPago
    }

    fn create_checkout(&self, order: &PurchaseOrder, description: &str) -> Result<Checkout, ApiError> {
        let preference = self.client.create_preference(CreatePreferenceRequest {
            items: vec![PreferenceItem {
                title: description.to_string(),
                quantity: 1,
                unit_price: order.total_price_in_cents as f64 / 100.0,
                currency_id: order.currency.to_uppercase(),
            }],
            external_reference: order.id.to_string(),
            back_urls: BackUrls {
                success: format!("{}/orders/{}?payment=success", self.front_end_url, order.id),
                failure: format!("{}/orders/{}?payment=failure", self.front_end_url, order.id),
                pending: format!("{}/orders/{}?payment=pending", self.front_end_url, order.id),
            },
            notification_url: self.notification_url.clone(),
            auto_return: "approved".to_string(),
        })?;

        let payment_link = preference
            .init_point
            .ok_or_else(|| ApplicationError::new("MercadoPago returned a preference without an init point".to_string()))?;

        Ok(Checkout {
            reference_id: order.id.to_string(),
            payment_link,
        })
    }

    fn checkout_status(&self, order: &PurchaseOrder) -> Result<Option<PaymentStatus>, ApiError> {
        let payments = self.client.search_payments_by_reference(&order.id.to_string())?;
        if payments.iter().any(|p| p.is_approved()) {
            Ok(Some(PaymentStatus::Paid))
        } else {
            // Rejected attempts leave the order open for another try
            Ok(None)
        }
    }

    fn cancel_checkout(&self, _order: &PurchaseOrder) -> Result<(), ApiError> {
        // Preferences have no cancel endpoint; expiry is enforced on our side
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn notification_url_points_at_webhook_route() {
        std::env::set_var("TEST_DATABASE_URL", "postgres://localhost/gather_test");
        std::env::set_var("FRONT_END_URL", "http://localhost:3000");
        std::env::set_var("TOKEN_SECRET", "secret");
        std::env::set_var("COMMUNICATION_DEFAULT_SOURCE_EMAIL", "noreply@example.com");

        let config = Config::new(Environment::Test);
        let gateway = MercadoPagoGateway::new(&config);
        // Must match the route the server mounts for the IPN controller
        assert!(gateway.notification_url.ends_with("/webhooks/mercadopago"));
    }
}
