use crate::graphql::connection;
use crate::graphql::enums;
use crate::graphql::objects::{DisplayCommunity, DisplayTicketTemplate};
use async_graphql::{Context, Object, Result};
use chrono::NaiveDateTime;
use gather_db::prelude::*;
use uuid::Uuid;

pub struct DisplayEvent(pub Event);

#[Object(name = "Event")]
impl DisplayEvent {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn status(&self) -> enums::EventStatus {
        self.0.status.into()
    }

    async fn visibility(&self) -> enums::Visibility {
        self.0.visibility.into()
    }

    async fn starts_at(&self) -> NaiveDateTime {
        self.0.starts_at
    }

    async fn ends_at(&self) -> NaiveDateTime {
        self.0.ends_at
    }

    async fn timezone(&self) -> Option<&str> {
        self.0.timezone.as_deref()
    }

    async fn address(&self) -> Option<&str> {
        self.0.address.as_deref()
    }

    async fn latitude(&self) -> Option<&str> {
        self.0.latitude.as_deref()
    }

    async fn longitude(&self) -> Option<&str> {
        self.0.longitude.as_deref()
    }

    async fn max_attendees(&self) -> Option<i64> {
        self.0.max_attendees
    }

    async fn preview_image_url(&self) -> Option<&str> {
        self.0.preview_image_url.as_deref()
    }

    async fn community(&self, ctx: &Context<'_>) -> Result<DisplayCommunity> {
        let mut conn = connection(ctx)?;
        Ok(DisplayCommunity(self.0.community(&mut conn)?))
    }

    async fn sessions(&self, ctx: &Context<'_>) -> Result<Vec<DisplaySession>> {
        let mut conn = connection(ctx)?;
        Ok(self.0.sessions(&mut conn)?.into_iter().map(DisplaySession).collect())
    }

    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<DisplayTag>> {
        let mut conn = connection(ctx)?;
        Ok(self.0.tags(&mut conn)?.into_iter().map(DisplayTag).collect())
    }

    async fn ticket_templates(&self, ctx: &Context<'_>) -> Result<Vec<DisplayTicketTemplate>> {
        let mut conn = connection(ctx)?;
        let templates = TicketTemplate::find_for_event(self.0.id, &mut conn)?;
        Ok(templates.into_iter().map(DisplayTicketTemplate).collect())
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }
}

pub struct DisplaySession(pub Session);

#[Object(name = "Session")]
impl DisplaySession {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn speaker_names(&self) -> &[String] {
        &self.0.speaker_names
    }

    async fn starts_at(&self) -> Option<NaiveDateTime> {
        self.0.starts_at
    }

    async fn ends_at(&self) -> Option<NaiveDateTime> {
        self.0.ends_at
    }

    async fn room(&self) -> Option<&str> {
        self.0.room.as_deref()
    }
}

pub struct DisplayTag(pub Tag);

#[Object(name = "Tag")]
impl DisplayTag {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
}
