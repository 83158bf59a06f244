use std::error::Error;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct StripeError {
    pub description: String,
    pub cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Error for StripeError {}

impl fmt::Display for StripeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.cause {
            Some(cause) => write!(f, "{} caused by: {}", self.description, cause),
            None => write!(f, "{}", self.description),
        }
    }
}

impl StripeError {
    pub fn from_response(response: reqwest::blocking::Response) -> StripeError {
        StripeError {
            description: format!(
                "Error calling Stripe: HTTP Code {}: Body:{}",
                response.status(),
                response
                    .text()
                    .unwrap_or_else(|_| "<Error reading response body>".to_string())
            ),
            cause: None,
        }
    }
}

impl From<reqwest::Error> for StripeError {
    fn from(r: reqwest::Error) -> Self {
        StripeError {
            description: format!("Error calling Stripe: reqwest error {}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

impl From<serde_json::Error> for StripeError {
    fn from(r: serde_json::Error) -> Self {
        StripeError {
            description: format!("Error deserializing response:{}", r),
            cause: Some(Arc::new(r)),
        }
    }
}
