use crate::config::Config;
use crate::errors::{ApiError, ApplicationError};
use crate::payments::{Checkout, PaymentGateway};
use chrono::{Duration, Utc};
use gather_db::prelude::*;
use stripe::{CreateCheckoutSessionRequest, StripeClient};

pub struct StripeGateway {
    client: StripeClient,
    front_end_url: String,
    expiry_minutes: i64,
}

impl StripeGateway {
    pub fn new(config: &Config) -> StripeGateway {
        StripeGateway {
            client: StripeClient::new(config.stripe_secret_key.clone()),
            front_end_url: config.front_end_url.clone(),
            expiry_minutes: config.purchase_order_expiry_minutes,
        }
    }

    fn reference_id(order: &PurchaseOrder) -> Result<&str, ApiError> {
        order
            .payment_platform_reference_id
            .as_deref()
            .ok_or_else(|| ApplicationError::new("Purchase order has no payment reference".to_string()).into())
    }
}

impl PaymentGateway for StripeGateway {
    fn platform(&self) -> PaymentPlatform {
        PaymentPlatform::Stripe
    }

    fn create_checkout(&self, order: &PurchaseOrder, description: &str) -> Result<Checkout, ApiError> {
        // Stripe enforces a minimum checkout lifetime of 30 minutes
        let expiry_minutes = self.expiry_minutes.max(30);
        let expires_at = (Utc::now() + Duration::minutes(expiry_minutes)).timestamp();

        let session = self.client.create_checkout_session(CreateCheckoutSessionRequest {
            line_item_name: description.to_string(),
            amount_in_cents: order.total_price_in_cents,
            currency: order.currency.clone(),
            client_reference_id: order.id.to_string(),
            success_url: format!("{}/orders/{}?payment=success", self.front_end_url, order.id),
            cancel_url: format!("{}/orders/{}?payment=cancelled", self.front_end_url, order.id),
            expires_at: Some(expires_at),
        })?;

        let payment_link = session
            .url
            .ok_or_else(|| ApplicationError::new("Stripe returned a checkout session without a URL".to_string()))?;

        Ok(Checkout {
            reference_id: session.id,
            payment_link,
        })
    }

    fn checkout_status(&self, order: &PurchaseOrder) -> Result<Option<PaymentStatus>, ApiError> {
        let session = self.client.retrieve_checkout_session(Self::reference_id(order)?)?;
        if session.is_paid() {
            Ok(Some(PaymentStatus::Paid))
        } else if session.is_expired() {
            Ok(Some(PaymentStatus::Expired))
        } else {
            Ok(None)
        }
    }

    fn cancel_checkout(&self, order: &PurchaseOrder) -> Result<(), ApiError> {
        self.client.expire_checkout_session(Self::reference_id(order)?)?;
        Ok(())
    }
}
