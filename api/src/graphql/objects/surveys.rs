use crate::graphql::connection;
use crate::graphql::enums;
use async_graphql::{Context, Object, Result};
use chrono::NaiveDateTime;
use gather_db::prelude::*;
use uuid::Uuid;

pub struct DisplayCompany(pub Company);

#[Object(name = "Company")]
impl DisplayCompany {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    async fn domain(&self) -> &str {
        &self.0.domain
    }

    async fn logo_url(&self) -> Option<&str> {
        self.0.logo_url.as_deref()
    }
}

pub struct DisplayWorkEmail(pub WorkEmail);

// The confirmation code is deliberately not exposed; it only ever travels
// in the confirmation email.
#[Object(name = "WorkEmail")]
impl DisplayWorkEmail {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn status(&self) -> enums::WorkEmailStatus {
        self.0.status.into()
    }

    async fn confirmed_at(&self) -> Option<NaiveDateTime> {
        self.0.confirmed_at
    }
}

pub struct DisplaySalary(pub Salary);

#[Object(name = "Salary")]
impl DisplaySalary {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn amount_in_cents(&self) -> i64 {
        self.0.amount_in_cents
    }

    async fn currency(&self) -> &str {
        &self.0.currency
    }

    async fn work_role(&self) -> &str {
        &self.0.work_role
    }

    async fn years_of_experience(&self) -> i32 {
        self.0.years_of_experience
    }

    async fn gender(&self) -> Option<&str> {
        self.0.gender.as_deref()
    }

    async fn country_code(&self) -> &str {
        &self.0.country_code
    }

    async fn work_setting(&self) -> enums::WorkSetting {
        self.0.work_setting.into()
    }

    async fn company(&self, ctx: &Context<'_>) -> Result<DisplayCompany> {
        let mut conn = connection(ctx)?;
        Ok(DisplayCompany(self.0.company(&mut conn)?))
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }
}
