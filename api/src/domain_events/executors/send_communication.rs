use crate::communications::templates;
use crate::config::Config;
use crate::domain_events::DomainActionExecutor;
use crate::errors::ApiError;
use diesel::PgConnection;
use gather_db::prelude::*;
use log::Level::Info;
use resend::{EmailRequest, ResendClient};

pub struct SendCommunicationExecutor {
    config: Config,
}

impl SendCommunicationExecutor {
    pub fn new(config: Config) -> SendCommunicationExecutor {
        SendCommunicationExecutor { config }
    }
}

impl DomainActionExecutor for SendCommunicationExecutor {
    fn execute(&self, action: &DomainAction, _conn: &mut PgConnection) -> Result<(), ApiError> {
        let communication: Communication = serde_json::from_value(action.payload.clone())?;

        if self.config.block_external_comms {
            jlog!(Info, "gather::domain_actions", "Email blocked by configuration", {
                "template_id": &communication.template_id
            });
            return Ok(());
        }

        let (subject, html) = templates::render(
            &communication.template_id,
            &communication.title,
            &communication.template_data,
        )?;
        let from = match &communication.source {
            Some(source) => source.get_first()?,
            None => self.config.communication_default_source_email.clone(),
        };

        let client = ResendClient::new(self.config.resend_api_key.clone());
        // The action id doubles as idempotency key across retries
        client.send(
            &EmailRequest {
                from,
                to: communication.destinations.get(),
                subject,
                html,
            },
            Some(&action.id.to_string()),
        )?;

        Ok(())
    }
}
