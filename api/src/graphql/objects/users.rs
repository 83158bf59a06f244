use async_graphql::Object;
use chrono::NaiveDateTime;
use gather_db::prelude::User;
use uuid::Uuid;

pub struct DisplayUser(pub User);

#[Object(name = "User")]
impl DisplayUser {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    async fn username(&self) -> Option<&str> {
        self.0.username.as_deref()
    }

    async fn full_name(&self) -> String {
        self.0.full_name()
    }

    async fn bio(&self) -> Option<&str> {
        self.0.bio.as_deref()
    }

    async fn image_url(&self) -> Option<&str> {
        self.0.image_url.as_deref()
    }

    async fn admin(&self) -> bool {
        self.0.admin
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }
}
