#[macro_use]
extern crate logging;

use log::Level::Debug;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

const API_VERSION: &str = "v2021-06-07";

/// An image stored in the Sanity media library.
#[derive(Clone, Debug, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    document: ImageAsset,
}

#[derive(Debug)]
pub struct SanityError {
    pub description: String,
    pub cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Error for SanityError {}

impl fmt::Display for SanityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match &self.cause {
            Some(cause) => write!(f, "{} caused by: {}", self.description, cause),
            None => write!(f, "{}", self.description),
        }
    }
}

impl SanityError {
    fn from_response(response: reqwest::blocking::Response) -> SanityError {
        SanityError {
            description: format!(
                "Error calling Sanity: HTTP Code {}: Body:{}",
                response.status(),
                response
                    .text()
                    .unwrap_or_else(|_| "<Error reading response body>".to_string())
            ),
            cause: None,
        }
    }
}

impl From<reqwest::Error> for SanityError {
    fn from(r: reqwest::Error) -> Self {
        SanityError {
            description: format!("Error calling Sanity: reqwest error {}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

impl From<serde_json::Error> for SanityError {
    fn from(r: serde_json::Error) -> Self {
        SanityError {
            description: format!("Error deserializing response:{}", r),
            cause: Some(Arc::new(r)),
        }
    }
}

pub struct SanityClient {
    project_id: String,
    dataset: String,
    token: String,
}

impl SanityClient {
    pub fn new(project_id: String, dataset: String, token: String) -> SanityClient {
        SanityClient {
            project_id,
            dataset,
            token,
        }
    }

    /// Downloads the image at `source_url` and stores it in the media
    /// library, returning the hosted asset.
    pub fn upload_image_from_url(&self, source_url: &str) -> Result<ImageAsset, SanityError> {
        jlog!(Debug, "Importing image into Sanity", { "source_url": source_url });

        let client = reqwest::blocking::Client::new();
        let download = client.get(source_url).send()?;
        if !download.status().is_success() {
            return Err(SanityError {
                description: format!("Could not download source image: HTTP Code {}", download.status()),
                cause: None,
            });
        }
        let content_type = download
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = download.bytes()?;

        let response = client
            .post(format!(
                "https://{}.api.sanity.io/{}/assets/images/{}",
                self.project_id, API_VERSION, self.dataset
            ))
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()?;

        if response.status().is_success() {
            let upload: UploadResponse = serde_json::from_str(&response.text()?)?;
            Ok(upload.document)
        } else {
            Err(SanityError::from_response(response))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upload_response() {
        let body = r#"{"document":{"_id":"image-abc123-2000x1000-jpg","url":"https://cdn.sanity.io/images/p/d/abc123-2000x1000.jpg","_type":"sanity.imageAsset"}}"#;
        let upload: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(upload.document.id, "image-abc123-2000x1000-jpg");
    }
}
