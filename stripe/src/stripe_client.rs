use crate::checkout_session::{CheckoutSession, CreateCheckoutSessionRequest};
use crate::stripe_error::StripeError;
use log::Level::Debug;

const BASE_URL: &str = "https://api.stripe.com/v1";

pub struct StripeClient {
    api_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(api_key: String) -> StripeClient {
        StripeClient {
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> StripeClient {
        StripeClient { api_key, base_url }
    }

    /// Creates a hosted checkout page for a single payment. The purchase
    /// order id travels in `client_reference_id` so the webhook and polling
    /// paths can find their way back.
    pub fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let mut params = Vec::new();
        params.push(("mode".to_string(), "payment".to_string()));
        params.push(("success_url".to_string(), request.success_url));
        params.push(("cancel_url".to_string(), request.cancel_url));
        params.push(("client_reference_id".to_string(), request.client_reference_id));
        params.push(("line_items[0][quantity]".to_string(), "1".to_string()));
        params.push((
            "line_items[0][price_data][currency]".to_string(),
            request.currency.to_lowercase(),
        ));
        params.push((
            "line_items[0][price_data][unit_amount]".to_string(),
            request.amount_in_cents.to_string(),
        ));
        params.push((
            "line_items[0][price_data][product_data][name]".to_string(),
            request.line_item_name,
        ));
        if let Some(expires_at) = request.expires_at {
            params.push(("expires_at".to_string(), expires_at.to_string()));
        }

        jlog!(Debug, "Creating Stripe checkout session", {
            "currency": &request.currency,
            "amount_in_cents": request.amount_in_cents
        });

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(format!("{}/checkout/sessions", self.base_url))
            .basic_auth(&self.api_key, Some(""))
            .form(&params)
            .send()?;

        if response.status().is_success() {
            Ok(serde_json::from_str(&response.text()?)?)
        } else {
            Err(StripeError::from_response(response))
        }
    }

    pub fn retrieve_checkout_session(&self, id: &str) -> Result<CheckoutSession, StripeError> {
        let client = reqwest::blocking::Client::new();
        let response = client
            .get(format!("{}/checkout/sessions/{}", self.base_url, id))
            .basic_auth(&self.api_key, Some(""))
            .send()?;

        if response.status().is_success() {
            Ok(serde_json::from_str(&response.text()?)?)
        } else {
            Err(StripeError::from_response(response))
        }
    }

    /// Expires an open checkout session so the customer can no longer pay
    /// through it.
    pub fn expire_checkout_session(&self, id: &str) -> Result<CheckoutSession, StripeError> {
        let client = reqwest::blocking::Client::new();
        let response = client
            .post(format!("{}/checkout/sessions/{}/expire", self.base_url, id))
            .basic_auth(&self.api_key, Some(""))
            .send()?;

        if response.status().is_success() {
            Ok(serde_json::from_str(&response.text()?)?)
        } else {
            Err(StripeError::from_response(response))
        }
    }
}
