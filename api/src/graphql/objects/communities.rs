use crate::graphql::enums;
use crate::graphql::{auth_user, connection};
use crate::graphql::objects::{DisplayEvent, DisplayUser};
use async_graphql::{Context, Object, Result};
use chrono::NaiveDateTime;
use gather_db::prelude::*;
use uuid::Uuid;

pub struct DisplayCommunity(pub Community);

#[Object(name = "Community")]
impl DisplayCommunity {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn status(&self) -> enums::CommunityStatus {
        self.0.status.into()
    }

    async fn logo_url(&self) -> Option<&str> {
        self.0.logo_url.as_deref()
    }

    async fn banner_url(&self) -> Option<&str> {
        self.0.banner_url.as_deref()
    }

    async fn members(&self, ctx: &Context<'_>) -> Result<Vec<DisplayCommunityMember>> {
        let mut conn = connection(ctx)?;
        let members = CommunityMember::find_for_community(self.0.id, &mut conn)?;
        Ok(members.into_iter().map(DisplayCommunityMember).collect())
    }

    async fn events(&self, ctx: &Context<'_>, status: Option<enums::EventStatus>) -> Result<Vec<DisplayEvent>> {
        let mut conn = connection(ctx)?;

        // Draft/private events are only listed for the community's organizers
        let organizer_scope = match auth_user(ctx, &mut conn) {
            Ok(user) => user.is_organizer(self.0.id, &mut conn)?,
            Err(_) => false,
        };

        let parameters = EventSearchParameters {
            community_id: Some(self.0.id),
            status: status.map(Into::into),
            ..Default::default()
        };
        let mut events = Event::search(&parameters, &mut conn)?;
        if !organizer_scope {
            events.retain(|e| e.publicly_visible());
        }
        Ok(events.into_iter().map(DisplayEvent).collect())
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }
}

pub struct DisplayCommunityMember(pub CommunityMember);

#[Object(name = "CommunityMember")]
impl DisplayCommunityMember {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn role(&self) -> enums::CommunityRole {
        self.0.role.into()
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<DisplayUser> {
        let mut conn = connection(ctx)?;
        Ok(DisplayUser(User::find(self.0.user_id, &mut conn)?))
    }

    async fn community(&self, ctx: &Context<'_>) -> Result<DisplayCommunity> {
        let mut conn = connection(ctx)?;
        Ok(DisplayCommunity(Community::find(self.0.community_id, &mut conn)?))
    }
}
