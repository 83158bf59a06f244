use crate::models::enums::*;
use crate::models::{Community, Session, Tag};
use crate::schema::{event_tags, events, sessions, tags};
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use crate::validators::{append_validation_error, start_date_valid};
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(Community))]
pub struct Event {
    pub id: Uuid,
    pub community_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: EventStatus,
    pub visibility: Visibility,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub timezone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub max_attendees: Option<i64>,
    pub preview_image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub community_id: Uuid,
    #[validate(length(min = 1, message = "Name cannot be blank"))]
    pub name: String,
    pub description: Option<String>,
    pub status: EventStatus,
    pub visibility: Visibility,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub timezone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub max_attendees: Option<i64>,
}

#[derive(AsChangeset, Default, Deserialize, Validate)]
#[diesel(table_name = events)]
pub struct EventEditableAttributes {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<EventStatus>,
    pub visibility: Option<Visibility>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub timezone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub max_attendees: Option<i64>,
    #[validate(url(message = "Preview image URL is invalid"))]
    pub preview_image_url: Option<String>,
}

/// Filters applied by the `events` query.
#[derive(Default)]
pub struct EventSearchParameters {
    pub community_id: Option<Uuid>,
    pub status: Option<EventStatus>,
    pub tag_id: Option<Uuid>,
    pub query: Option<String>,
    pub starts_after: Option<NaiveDateTime>,
    pub ends_before: Option<NaiveDateTime>,
}

impl NewEvent {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        self.validate()?;
        append_validation_error(Ok(()), "starts_at", start_date_valid(self.starts_at, self.ends_at))?;

        diesel::insert_into(events::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new event")
    }
}

impl Event {
    pub fn create(
        community_id: Uuid,
        name: &str,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> NewEvent {
        NewEvent {
            community_id,
            name: name.to_string(),
            description: None,
            status: EventStatus::Draft,
            visibility: Visibility::Public,
            starts_at,
            ends_at,
            timezone: None,
            address: None,
            latitude: None,
            longitude: None,
            max_attendees: None,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        events::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading event")
    }

    pub fn search(parameters: &EventSearchParameters, conn: &mut PgConnection) -> Result<Vec<Event>, DatabaseError> {
        let mut query = events::table.order_by(events::starts_at.asc()).into_boxed();

        if let Some(community_id) = parameters.community_id {
            query = query.filter(events::community_id.eq(community_id));
        }
        if let Some(status) = parameters.status {
            query = query.filter(events::status.eq(status));
        }
        if let Some(tag_id) = parameters.tag_id {
            let tagged_event_ids = event_tags::table
                .filter(event_tags::tag_id.eq(tag_id))
                .select(event_tags::event_id);
            query = query.filter(events::id.eq_any(tagged_event_ids));
        }
        if let Some(ref name_query) = parameters.query {
            query = query.filter(events::name.ilike(format!("%{}%", name_query)));
        }
        if let Some(starts_after) = parameters.starts_after {
            query = query.filter(events::starts_at.ge(starts_after));
        }
        if let Some(ends_before) = parameters.ends_before {
            query = query.filter(events::ends_at.le(ends_before));
        }

        query
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error searching events")
    }

    pub fn update(&self, attributes: EventEditableAttributes, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        attributes.validate()?;

        let starts_at = attributes.starts_at.unwrap_or(self.starts_at);
        let ends_at = attributes.ends_at.unwrap_or(self.ends_at);
        append_validation_error(Ok(()), "starts_at", start_date_valid(starts_at, ends_at))?;

        diesel::update(self)
            .set((attributes, events::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update event")
    }

    pub fn set_preview_image_url(&self, url: &str, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        diesel::update(self)
            .set((
                events::preview_image_url.eq(url),
                events::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update event preview image")
    }

    pub fn community(&self, conn: &mut PgConnection) -> Result<Community, DatabaseError> {
        Community::find(self.community_id, conn)
    }

    pub fn sessions(&self, conn: &mut PgConnection) -> Result<Vec<Session>, DatabaseError> {
        sessions::table
            .filter(sessions::event_id.eq(self.id))
            .order_by(sessions::starts_at.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading event sessions")
    }

    pub fn tags(&self, conn: &mut PgConnection) -> Result<Vec<Tag>, DatabaseError> {
        event_tags::table
            .inner_join(tags::table)
            .filter(event_tags::event_id.eq(self.id))
            .select(tags::all_columns)
            .order_by(tags::name.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading event tags")
    }

    pub fn add_tag(&self, tag_id: Uuid, conn: &mut PgConnection) -> Result<(), DatabaseError> {
        diesel::insert_into(event_tags::table)
            .values((event_tags::event_id.eq(self.id), event_tags::tag_id.eq(tag_id)))
            .execute(conn)
            .to_db_error(ErrorCode::InsertError, "Could not tag event")?;
        Ok(())
    }

    /// An event is shown to the general public only when it is both active
    /// and publicly visible. Anything else requires community scope.
    pub fn publicly_visible(&self) -> bool {
        self.status == EventStatus::Active && self.visibility == Visibility::Public
    }

    /// Claims are accepted for active events that are public or shared by
    /// link; private events never sell tickets.
    pub fn open_for_claims(&self) -> bool {
        self.status == EventStatus::Active && self.visibility != Visibility::Private
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, day)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    #[test]
    fn new_event_defaults_to_draft() {
        let event = Event::create(Uuid::new_v4(), "RustConf Mixer", date(1), date(2));
        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(event.visibility, Visibility::Public);
    }

    #[test]
    fn public_visibility_requires_active_status() {
        let now = chrono::Utc::now().naive_utc();
        let event = Event {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            name: "RustConf Mixer".to_string(),
            description: None,
            status: EventStatus::Draft,
            visibility: Visibility::Public,
            starts_at: date(1),
            ends_at: date(2),
            timezone: None,
            address: None,
            latitude: None,
            longitude: None,
            max_attendees: None,
            preview_image_url: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!event.publicly_visible());

        let event = Event {
            status: EventStatus::Active,
            ..event
        };
        assert!(event.publicly_visible());

        let event = Event {
            visibility: Visibility::Unlisted,
            ..event
        };
        assert!(!event.publicly_visible());
    }

    #[test]
    fn claims_closed_for_private_or_inactive_events() {
        let now = chrono::Utc::now().naive_utc();
        let event = Event {
            id: Uuid::new_v4(),
            community_id: Uuid::new_v4(),
            name: "RustConf Mixer".to_string(),
            description: None,
            status: EventStatus::Active,
            visibility: Visibility::Public,
            starts_at: date(1),
            ends_at: date(2),
            timezone: None,
            address: None,
            latitude: None,
            longitude: None,
            max_attendees: None,
            preview_image_url: None,
            created_at: now,
            updated_at: now,
        };
        assert!(event.open_for_claims());

        // Link-shared events still sell tickets
        let event = Event {
            visibility: Visibility::Unlisted,
            ..event
        };
        assert!(event.open_for_claims());

        let event = Event {
            visibility: Visibility::Private,
            ..event
        };
        assert!(!event.open_for_claims());

        let event = Event {
            status: EventStatus::Draft,
            visibility: Visibility::Public,
            ..event
        };
        assert!(!event.open_for_claims());
    }
}
