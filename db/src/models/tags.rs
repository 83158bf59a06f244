use crate::schema::tags;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = tags)]
pub struct NewTag {
    #[validate(length(min = 1, message = "Name cannot be blank"))]
    pub name: String,
    pub description: Option<String>,
}

impl NewTag {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Tag, DatabaseError> {
        self.validate()?;

        diesel::insert_into(tags::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new tag")
    }
}

impl Tag {
    pub fn create(name: &str, description: Option<String>) -> NewTag {
        NewTag {
            name: name.to_string(),
            description,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Tag, DatabaseError> {
        tags::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading tag")
    }

    pub fn find_by_name(name: &str, conn: &mut PgConnection) -> Result<Tag, DatabaseError> {
        tags::table
            .filter(tags::name.eq(name))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading tag by name")
    }

    pub fn find_all(conn: &mut PgConnection) -> Result<Vec<Tag>, DatabaseError> {
        tags::table
            .order_by(tags::name.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading tags")
    }
}
