#[macro_use]
extern crate logging;

use log::Level::Debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

const BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
pub struct EmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailResponse {
    pub id: String,
}

#[derive(Debug)]
pub struct ResendError {
    pub description: String,
    pub cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Error for ResendError {}

impl fmt::Display for ResendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.cause {
            Some(cause) => write!(f, "{} caused by: {}", self.description, cause),
            None => write!(f, "{}", self.description),
        }
    }
}

impl ResendError {
    fn from_response(response: reqwest::blocking::Response) -> ResendError {
        ResendError {
            description: format!(
                "Error calling Resend: HTTP Code {}: Body:{}",
                response.status(),
                response
                    .text()
                    .unwrap_or_else(|_| "<Error reading response body>".to_string())
            ),
            cause: None,
        }
    }
}

impl From<reqwest::Error> for ResendError {
    fn from(r: reqwest::Error) -> Self {
        ResendError {
            description: format!("Error calling Resend: reqwest error {}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

impl From<serde_json::Error> for ResendError {
    fn from(r: serde_json::Error) -> Self {
        ResendError {
            description: format!("Error deserializing response:{}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

pub struct ResendClient {
    api_key: String,
    base_url: String,
}

impl ResendClient {
    pub fn new(api_key: String) -> ResendClient {
        ResendClient {
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> ResendClient {
        ResendClient { api_key, base_url }
    }

    /// Sends one email. `idempotency_key` guards against double delivery
    /// when the queue retries an action.
    pub fn send(&self, request: &EmailRequest, idempotency_key: Option<&str>) -> Result<EmailResponse, ResendError> {
        jlog!(Debug, "Sending email via Resend", {
            "to": &request.to,
            "subject": &request.subject
        });

        let client = reqwest::blocking::Client::new();
        let mut builder = client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(key) = idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }
        let response = builder.send()?;

        if response.status().is_success() {
            Ok(serde_json::from_str(&response.text()?)?)
        } else {
            Err(ResendError::from_response(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_email_request() {
        let request = EmailRequest {
            from: "Gather <noreply@example.com>".to_string(),
            to: vec!["ana@example.com".to_string()],
            subject: "Your tickets".to_string(),
            html: "<p>See you there</p>".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["to"][0], "ana@example.com");
        assert_eq!(value["subject"], "Your tickets");
    }
}
