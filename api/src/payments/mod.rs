pub use self::mercado_pago_gateway::MercadoPagoGateway;
pub use self::stripe_gateway::StripeGateway;

mod mercado_pago_gateway;
mod stripe_gateway;

use crate::config::Config;
use crate::errors::{ApiError, ApplicationError};
use gather_db::prelude::*;

/// A hosted payment page created for a purchase order.
pub struct Checkout {
    pub reference_id: String,
    pub payment_link: String,
}

/// Common surface over the payment providers. One gateway per platform;
/// orders are routed by currency.
pub trait PaymentGateway: Send + Sync {
    fn platform(&self) -> PaymentPlatform;

    fn create_checkout(&self, order: &PurchaseOrder, description: &str) -> Result<Checkout, ApiError>;

    /// Polls the provider for the order's settlement state. `None` means
    /// nothing changed and the order stays unpaid.
    fn checkout_status(&self, order: &PurchaseOrder) -> Result<Option<PaymentStatus>, ApiError>;

    /// Closes the provider-side checkout so the customer can no longer pay
    /// an order we have expired or cancelled.
    fn cancel_checkout(&self, order: &PurchaseOrder) -> Result<(), ApiError>;
}

/// USD settles through Stripe; Latin American currencies through
/// MercadoPago.
pub fn platform_for_currency(currency: &str) -> Result<PaymentPlatform, ApiError> {
    match currency.to_uppercase().as_str() {
        "USD" => Ok(PaymentPlatform::Stripe),
        "MXN" | "ARS" | "CLP" | "COP" => Ok(PaymentPlatform::MercadoPago),
        other => {
            Err(ApplicationError::new(format!("No payment platform available for currency {}", other)).into())
        }
    }
}

pub struct PaymentProviders {
    stripe: StripeGateway,
    mercado_pago: MercadoPagoGateway,
}

impl PaymentProviders {
    pub fn from_config(config: &Config) -> PaymentProviders {
        PaymentProviders {
            stripe: StripeGateway::new(config),
            mercado_pago: MercadoPagoGateway::new(config),
        }
    }

    pub fn gateway(&self, platform: PaymentPlatform) -> &dyn PaymentGateway {
        match platform {
            PaymentPlatform::Stripe => &self.stripe,
            PaymentPlatform::MercadoPago => &self.mercado_pago,
        }
    }

    pub fn for_currency(&self, currency: &str) -> Result<&dyn PaymentGateway, ApiError> {
        Ok(self.gateway(platform_for_currency(currency)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_currencies_to_platforms() {
        assert_eq!(platform_for_currency("USD").unwrap(), PaymentPlatform::Stripe);
        assert_eq!(platform_for_currency("usd").unwrap(), PaymentPlatform::Stripe);
        assert_eq!(platform_for_currency("MXN").unwrap(), PaymentPlatform::MercadoPago);
        assert_eq!(platform_for_currency("ARS").unwrap(), PaymentPlatform::MercadoPago);
        assert_eq!(platform_for_currency("CLP").unwrap(), PaymentPlatform::MercadoPago);
        assert_eq!(platform_for_currency("COP").unwrap(), PaymentPlatform::MercadoPago);
    }

    #[test]
    fn rejects_unsupported_currency() {
        assert!(platform_for_currency("EUR").is_err());
        assert!(platform_for_currency("").is_err());
    }
}
