use crate::models::enums::*;
use crate::schema::communities;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(table_name = communities)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: CommunityStatus,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = communities)]
pub struct NewCommunity {
    #[validate(length(min = 1, message = "Name cannot be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug cannot be blank"))]
    pub slug: String,
    pub description: Option<String>,
    pub status: CommunityStatus,
    #[validate(url(message = "Logo URL is invalid"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "Banner URL is invalid"))]
    pub banner_url: Option<String>,
}

#[derive(AsChangeset, Default, Deserialize, Validate)]
#[diesel(table_name = communities)]
pub struct CommunityEditableAttributes {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<CommunityStatus>,
    #[validate(url(message = "Logo URL is invalid"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "Banner URL is invalid"))]
    pub banner_url: Option<String>,
}

impl NewCommunity {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Community, DatabaseError> {
        self.validate()?;

        diesel::insert_into(communities::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new community")
    }
}

impl Community {
    pub fn create(name: &str, slug: &str) -> NewCommunity {
        NewCommunity {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            status: CommunityStatus::Active,
            logo_url: None,
            banner_url: None,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Community, DatabaseError> {
        communities::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading community")
    }

    pub fn find_by_slug(slug: &str, conn: &mut PgConnection) -> Result<Community, DatabaseError> {
        communities::table
            .filter(communities::slug.eq(slug))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading community by slug")
    }

    pub fn find_all(status: Option<CommunityStatus>, conn: &mut PgConnection) -> Result<Vec<Community>, DatabaseError> {
        let mut query = communities::table.order_by(communities::name.asc()).into_boxed();

        if let Some(status) = status {
            query = query.filter(communities::status.eq(status));
        }

        query
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading communities")
    }

    pub fn update(
        &self,
        attributes: CommunityEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<Community, DatabaseError> {
        attributes.validate()?;

        diesel::update(self)
            .set((attributes, communities::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update community")
    }
}
