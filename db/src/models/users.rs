use crate::schema::users;
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
pub struct User {
    pub id: Uuid,
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub admin: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub sub: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    pub name: Option<String>,
    pub admin: bool,
}

#[derive(AsChangeset, Default, Deserialize, Validate)]
#[diesel(table_name = users)]
pub struct UserEditableAttributes {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    #[validate(url(message = "Image URL is invalid"))]
    pub image_url: Option<String>,
}

impl NewUser {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        self.validate()?;

        diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new user")
    }
}

impl User {
    pub fn create(sub: &str, email: &str, name: Option<String>) -> NewUser {
        NewUser {
            sub: sub.to_string(),
            email: email.to_string(),
            name,
            admin: false,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        users::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading user")
    }

    /// Authentication lookup. Soft-deleted accounts are invisible here so a
    /// disabled user can never authenticate again.
    pub fn find_by_sub(sub: &str, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        users::table
            .filter(users::sub.eq(sub))
            .filter(users::deleted_at.is_null())
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading user by sub")
    }

    pub fn find_by_email(email: &str, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        users::table
            .filter(users::email.eq(email))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading user by email")
    }

    /// Case-insensitive substring search over name, username and email,
    /// excluding soft-deleted accounts.
    pub fn search(query: &str, limit: i64, conn: &mut PgConnection) -> Result<Vec<User>, DatabaseError> {
        let pattern = format!("%{}%", query.to_lowercase());
        users::table
            .filter(users::deleted_at.is_null())
            .filter(
                users::email
                    .ilike(pattern.clone())
                    .or(users::name.ilike(pattern.clone()))
                    .or(users::username.ilike(pattern)),
            )
            .order_by(users::created_at.asc())
            .limit(limit)
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error searching users")
    }

    pub fn update(&self, attributes: UserEditableAttributes, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        attributes.validate()?;

        diesel::update(self)
            .set((attributes, users::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update user")
    }

    pub fn full_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| self.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_rejects_invalid_email() {
        let user = User::create("auth0|abc", "not-an-email", None);
        assert!(user.validate().is_err());

        let user = User::create("auth0|abc", "jane@example.com", None);
        assert!(user.validate().is_ok());
    }

    fn fixture() -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: Uuid::new_v4(),
            sub: "auth0|abc".to_string(),
            email: "jane@example.com".to_string(),
            name: None,
            username: None,
            bio: None,
            image_url: None,
            admin: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn full_name_falls_back_through_username_to_email() {
        let mut user = fixture();
        assert_eq!(user.full_name(), "jane@example.com");
        user.username = Some("jane_d".to_string());
        assert_eq!(user.full_name(), "jane_d");
        user.name = Some("Jane Doe".to_string());
        assert_eq!(user.full_name(), "Jane Doe");
    }
}
