use crate::models::enums::*;
use crate::models::DomainAction;
use crate::utils::errors::DatabaseError;
use chrono::{Duration, Utc};
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

pub type TemplateData = HashMap<String, String>;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CommAddress {
    pub addresses: Vec<String>,
}

impl CommAddress {
    pub fn from(address: String) -> CommAddress {
        CommAddress {
            addresses: vec![address],
        }
    }

    pub fn from_vec(addresses: Vec<String>) -> CommAddress {
        CommAddress { addresses }
    }

    pub fn get(&self) -> Vec<String> {
        self.addresses.clone()
    }

    pub fn get_first(&self) -> Result<String, DatabaseError> {
        match self.addresses.first() {
            Some(address) => Ok(address.clone()),
            None => DatabaseError::business_process_error("Minimum of one communication address required"),
        }
    }
}

/// A templated email waiting to be delivered. Serialized into a domain
/// action payload and sent by the background worker.
#[derive(Debug, Deserialize, Serialize)]
pub struct Communication {
    pub title: String,
    pub source: Option<CommAddress>,
    pub destinations: CommAddress,
    pub template_id: String,
    pub template_data: TemplateData,
    pub main_table: Option<String>,
    pub main_table_id: Option<Uuid>,
}

impl Communication {
    pub fn new(
        title: String,
        source: Option<CommAddress>,
        destinations: CommAddress,
        template_id: String,
        template_data: TemplateData,
    ) -> Communication {
        Communication {
            title,
            source,
            destinations,
            template_id,
            template_data,
            main_table: None,
            main_table_id: None,
        }
    }

    pub fn queue(&self, conn: &mut PgConnection) -> Result<(), DatabaseError> {
        let now = Utc::now().naive_utc();
        DomainAction::create(
            DomainActionTypes::Communication,
            json!(&self),
            self.main_table.clone(),
            self.main_table_id,
            now,
            now + Duration::days(2),
            3,
        )
        .commit(conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_first_requires_an_address() {
        let empty = CommAddress { addresses: vec![] };
        assert!(empty.get_first().is_err());

        let populated = CommAddress::from("ana@example.com".to_string());
        assert_eq!(populated.get_first().unwrap(), "ana@example.com");
    }

    #[test]
    fn communication_round_trips_through_payload_json() {
        let mut data = TemplateData::new();
        data.insert("event_name".to_string(), "RustConf".to_string());
        let communication = Communication::new(
            "Your tickets".to_string(),
            Some(CommAddress::from("noreply@example.com".to_string())),
            CommAddress::from("ana@example.com".to_string()),
            "purchase-completed".to_string(),
            data,
        );

        let payload = serde_json::to_value(&communication).unwrap();
        let parsed: Communication = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.template_id, "purchase-completed");
        assert_eq!(parsed.destinations.get_first().unwrap(), "ana@example.com");
    }
}
