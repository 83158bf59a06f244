use crate::models::Event;
use crate::schema::sessions;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A speaker-schedule entry on an event.
#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(Event))]
pub struct Session {
    pub id: Uuid,
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub speaker_names: Vec<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub room: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub event_id: Uuid,
    #[validate(length(min = 1, message = "Title cannot be blank"))]
    pub title: String,
    pub description: Option<String>,
    pub speaker_names: Vec<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub room: Option<String>,
}

impl NewSession {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Session, DatabaseError> {
        self.validate()?;

        diesel::insert_into(sessions::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new session")
    }
}

impl Session {
    pub fn create(event_id: Uuid, title: &str, speaker_names: Vec<String>) -> NewSession {
        NewSession {
            event_id,
            title: title.to_string(),
            description: None,
            speaker_names,
            starts_at: None,
            ends_at: None,
            room: None,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Session, DatabaseError> {
        sessions::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading session")
    }
}
