use crate::config::Config;
use crate::domain_events::DomainActionExecutor;
use crate::errors::ApiError;
use diesel::PgConnection;
use gather_db::prelude::*;
use log::Level::Info;
use sanity::SanityClient;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize)]
pub struct ImportEventImagePayload {
    pub event_id: Uuid,
    pub source_url: String,
}

/// Copies an externally hosted image into the media library and points the
/// event's preview image at the hosted copy.
pub struct ImportEventImageExecutor {
    config: Config,
}

impl ImportEventImageExecutor {
    pub fn new(config: Config) -> ImportEventImageExecutor {
        ImportEventImageExecutor { config }
    }
}

impl DomainActionExecutor for ImportEventImageExecutor {
    fn execute(&self, action: &DomainAction, conn: &mut PgConnection) -> Result<(), ApiError> {
        let payload: ImportEventImagePayload = serde_json::from_value(action.payload.clone())?;
        let event = Event::find(payload.event_id, conn)?;

        let client = SanityClient::new(
            self.config.sanity_project_id.clone(),
            self.config.sanity_dataset.clone(),
            self.config.sanity_token.clone(),
        );
        let asset = client.upload_image_from_url(&payload.source_url)?;

        event.set_preview_image_url(&asset.url, conn)?;
        jlog!(Info, "gather::domain_actions", "Imported event image", {
            "event_id": event.id,
            "asset_id": &asset.id
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips() {
        let payload = ImportEventImagePayload {
            event_id: Uuid::new_v4(),
            source_url: "https://example.com/banner.png".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        let parsed: ImportEventImagePayload = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.event_id, payload.event_id);
        assert_eq!(parsed.source_url, payload.source_url);
    }
}
