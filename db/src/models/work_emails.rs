use crate::models::enums::*;
use crate::models::User;
use crate::schema::work_emails;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use crate::utils::errors::Optional;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A work email address a user is proving ownership of. The email's domain
/// ties the user to a company for salary entries.
#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(User))]
pub struct WorkEmail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub confirmation_code: Uuid,
    pub status: WorkEmailStatus,
    pub confirmed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = work_emails)]
pub struct NewWorkEmail {
    pub user_id: Uuid,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    pub confirmation_code: Uuid,
    pub status: WorkEmailStatus,
}

impl NewWorkEmail {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<WorkEmail, DatabaseError> {
        self.validate()?;

        diesel::insert_into(work_emails::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new work email")
    }
}

impl WorkEmail {
    /// Begins (or restarts) validation of a work email. Restarting an
    /// existing record rotates the confirmation code and drops any previous
    /// confirmation.
    pub fn start_validation(user: &User, email: &str, conn: &mut PgConnection) -> Result<WorkEmail, DatabaseError> {
        let email = email.to_lowercase();
        let existing: Option<WorkEmail> = work_emails::table
            .filter(work_emails::user_id.eq(user.id))
            .filter(work_emails::email.eq(&email))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading work email")
            .optional()?;

        match existing {
            Some(work_email) => diesel::update(&work_email)
                .set((
                    work_emails::confirmation_code.eq(Uuid::new_v4()),
                    work_emails::status.eq(WorkEmailStatus::Pending),
                    work_emails::confirmed_at.eq(None::<NaiveDateTime>),
                    work_emails::updated_at.eq(dsl::now),
                ))
                .get_result(conn)
                .to_db_error(ErrorCode::UpdateError, "Could not restart work email validation"),
            None => NewWorkEmail {
                user_id: user.id,
                email,
                confirmation_code: Uuid::new_v4(),
                status: WorkEmailStatus::Pending,
            }
            .commit(conn),
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<WorkEmail, DatabaseError> {
        work_emails::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading work email")
    }

    pub fn find_by_confirmation_code(code: Uuid, conn: &mut PgConnection) -> Result<WorkEmail, DatabaseError> {
        work_emails::table
            .filter(work_emails::confirmation_code.eq(code))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading work email by confirmation code")
    }

    pub fn find_for_user(user_id: Uuid, conn: &mut PgConnection) -> Result<Vec<WorkEmail>, DatabaseError> {
        work_emails::table
            .filter(work_emails::user_id.eq(user_id))
            .order_by(work_emails::created_at.desc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading work emails")
    }

    pub fn has_confirmed(user_id: Uuid, conn: &mut PgConnection) -> Result<bool, DatabaseError> {
        let count: i64 = work_emails::table
            .filter(work_emails::user_id.eq(user_id))
            .filter(work_emails::status.eq(WorkEmailStatus::Confirmed))
            .select(dsl::count(work_emails::id))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Error counting confirmed work emails")?;
        Ok(count > 0)
    }

    /// Confirms the email and consumes the code by rotating it.
    pub fn confirm(&self, conn: &mut PgConnection) -> Result<WorkEmail, DatabaseError> {
        if self.status == WorkEmailStatus::Confirmed {
            return DatabaseError::business_process_error("Work email has already been confirmed");
        }

        diesel::update(self)
            .set((
                work_emails::status.eq(WorkEmailStatus::Confirmed),
                work_emails::confirmed_at.eq(dsl::now),
                work_emails::confirmation_code.eq(Uuid::new_v4()),
                work_emails::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not confirm work email")
    }

    /// The domain part of the address, used to attach salaries to a company.
    pub fn domain(&self) -> Option<&str> {
        self.email.rsplit('@').next().filter(|d| !d.is_empty() && self.email.contains('@'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_email(email: &str, status: WorkEmailStatus) -> WorkEmail {
        let now = chrono::Utc::now().naive_utc();
        WorkEmail {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            confirmation_code: Uuid::new_v4(),
            status,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn domain_extraction() {
        assert_eq!(
            work_email("ana@example.com", WorkEmailStatus::Pending).domain(),
            Some("example.com")
        );
        assert_eq!(work_email("no-at-sign", WorkEmailStatus::Pending).domain(), None);
    }
}
