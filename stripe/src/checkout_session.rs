use serde::{Deserialize, Serialize};

/// A hosted Stripe Checkout page for a single payment.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub client_reference_id: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }

    pub fn is_expired(&self) -> bool {
        self.status.as_deref() == Some("expired")
    }
}

pub struct CreateCheckoutSessionRequest {
    pub line_item_name: String,
    pub amount_in_cents: i64,
    pub currency: String,
    pub client_reference_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub expires_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_checkout_session() {
        let body = r#"{
            "id": "cs_test_123",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_123",
            "status": "open",
            "payment_status": "unpaid",
            "client_reference_id": "order-1",
            "amount_total": 2500,
            "currency": "usd"
        }"#;
        let session: CheckoutSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.id, "cs_test_123");
        assert!(!session.is_paid());
        assert!(!session.is_expired());
    }

    #[test]
    fn paid_and_expired_flags() {
        let paid = CheckoutSession {
            id: "cs_1".to_string(),
            url: None,
            status: Some("complete".to_string()),
            payment_status: Some("paid".to_string()),
            client_reference_id: None,
            amount_total: Some(2500),
            currency: Some("usd".to_string()),
        };
        assert!(paid.is_paid());

        let expired = CheckoutSession {
            status: Some("expired".to_string()),
            payment_status: Some("unpaid".to_string()),
            ..paid
        };
        assert!(expired.is_expired());
    }
}
