#[macro_use]
extern crate logging;

use log::Level::Debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

const BASE_URL: &str = "https://api.mercadopago.com";

/// A checkout preference: the hosted payment page MercadoPago serves for an
/// order. `external_reference` carries our purchase order id.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Preference {
    pub id: String,
    pub init_point: Option<String>,
    pub sandbox_init_point: Option<String>,
    pub external_reference: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub external_reference: String,
    pub back_urls: BackUrls,
    pub notification_url: String,
    pub auto_return: String,
}

#[derive(Debug, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub currency_id: String,
}

#[derive(Debug, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// A payment attached to a preference, as returned by the payment search
/// endpoint.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Payment {
    pub id: i64,
    pub status: String,
    pub status_detail: Option<String>,
    pub external_reference: Option<String>,
    pub transaction_amount: Option<f64>,
    pub currency_id: Option<String>,
}

impl Payment {
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.status.as_str(), "rejected" | "cancelled")
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentSearchResponse {
    pub results: Vec<Payment>,
}

/// The notification body MercadoPago posts to our webhook. Only the payment
/// id is trusted; everything else is re-fetched from the API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IpnNotification {
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub action: Option<String>,
    pub data: Option<IpnData>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IpnData {
    pub id: String,
}

impl IpnNotification {
    pub fn is_payment(&self) -> bool {
        self.notification_type.as_deref() == Some("payment")
    }
}

#[derive(Debug)]
pub struct MercadoPagoError {
    pub description: String,
    pub cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Error for MercadoPagoError {}

impl fmt::Display for MercadoPagoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.cause {
            Some(cause) => write!(f, "{} caused by: {}", self.description, cause),
            None => write!(f, "{}", self.description),
        }
    }
}

impl MercadoPagoError {
    fn from_response(response: reqwest::blocking::Response) -> MercadoPagoError {
        MercadoPagoError {
            description: format!(
                "Error calling MercadoPago: HTTP Code {}: Body:{}",
                response.status(),
                response
                    .text()
                    .unwrap_or_else(|_| "<Error reading response body>".to_string())
            ),
            cause: None,
        }
    }
}

impl From<reqwest::Error> for MercadoPagoError {
    fn from(r: reqwest::Error) -> Self {
        MercadoPagoError {
            description: format!("Error calling MercadoPago: reqwest error {}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

impl From<serde_json::Error> for MercadoPagoError {
    fn from(r: serde_json::Error) -> Self {
        MercadoPagoError {
            description: format!("Error deserializing response:{}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

pub struct MercadoPagoClient {
    access_token: String,
    base_url: String,
}

impl MercadoPagoClient {
    pub fn new(access_token: String) -> MercadoPagoClient {
        MercadoPagoClient {
            access_token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(access_token: String, base_url: String) -> MercadoPagoClient {
        MercadoPagoClient { access_token, base_url }
    }

    pub fn create_preference(&self, request: CreatePreferenceRequest) -> Result<Preference, MercadoPagoError> {
        jlog!(Debug, "Creating MercadoPago preference", {
            "external_reference": &request.external_reference
        });

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(format!("{}/checkout/preferences", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()?;

        if response.status().is_success() {
            Ok(serde_json::from_str(&response.text()?)?)
        } else {
            Err(MercadoPagoError::from_response(response))
        }
    }

    pub fn get_payment(&self, payment_id: &str) -> Result<Payment, MercadoPagoError> {
        let client = reqwest::blocking::Client::new();
        let response = client
            .get(format!("{}/v1/payments/{}", self.base_url, payment_id))
            .bearer_auth(&self.access_token)
            .send()?;

        if response.status().is_success() {
            Ok(serde_json::from_str(&response.text()?)?)
        } else {
            Err(MercadoPagoError::from_response(response))
        }
    }

    /// All payments recorded against an external reference, newest first.
    pub fn search_payments_by_reference(&self, external_reference: &str) -> Result<Vec<Payment>, MercadoPagoError> {
        let client = reqwest::blocking::Client::new();
        let response = client
            .get(format!("{}/v1/payments/search", self.base_url))
            .query(&[("external_reference", external_reference), ("sort", "date_created"), ("criteria", "desc")])
            .bearer_auth(&self.access_token)
            .send()?;

        if response.status().is_success() {
            let search: PaymentSearchResponse = serde_json::from_str(&response.text()?)?;
            Ok(search.results)
        } else {
            Err(MercadoPagoError::from_response(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_ipn_notification() {
        let body = r#"{"action":"payment.updated","api_version":"v1","type":"payment","data":{"id":"12345"}}"#;
        let ipn: IpnNotification = serde_json::from_str(body).unwrap();
        assert!(ipn.is_payment());
        assert_eq!(ipn.data.unwrap().id, "12345");
    }

    #[test]
    fn ignores_non_payment_notifications() {
        let body = r#"{"type":"plan","data":{"id":"99"}}"#;
        let ipn: IpnNotification = serde_json::from_str(body).unwrap();
        assert!(!ipn.is_payment());
    }

    #[test]
    fn payment_status_flags() {
        let payment = Payment {
            id: 1,
            status: "approved".to_string(),
            status_detail: Some("accredited".to_string()),
            external_reference: Some("order-1".to_string()),
            transaction_amount: Some(150.0),
            currency_id: Some("MXN".to_string()),
        };
        assert!(payment.is_approved());
        assert!(!payment.is_rejected());

        let rejected = Payment {
            status: "rejected".to_string(),
            ..payment
        };
        assert!(rejected.is_rejected());
    }
}
