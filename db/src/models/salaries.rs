use crate::models::{Company, User, WorkEmail};
use crate::models::enums::*;
use crate::schema::salaries;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An anonymous-survey salary entry. Entries can only be created by users
/// with a confirmed work email, which is what ties them to a company.
#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Company))]
#[diesel(table_name = salaries)]
pub struct Salary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub amount_in_cents: i64,
    pub currency: String,
    pub work_role: String,
    pub years_of_experience: i32,
    pub gender: Option<String>,
    pub country_code: String,
    pub work_setting: WorkSetting,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = salaries)]
pub struct NewSalary {
    pub user_id: Uuid,
    pub company_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_in_cents: i64,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3 letter code"))]
    pub currency: String,
    #[validate(length(min = 1, message = "Role cannot be blank"))]
    pub work_role: String,
    #[validate(range(min = 0, max = 70, message = "Years of experience is out of range"))]
    pub years_of_experience: i32,
    pub gender: Option<String>,
    #[validate(length(min = 2, max = 2, message = "Country must be a 2 letter code"))]
    pub country_code: String,
    pub work_setting: WorkSetting,
}

#[derive(AsChangeset, Default, Deserialize, Validate)]
#[diesel(table_name = salaries)]
pub struct SalaryEditableAttributes {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_in_cents: Option<i64>,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3 letter code"))]
    pub currency: Option<String>,
    #[validate(length(min = 1, message = "Role cannot be blank"))]
    pub work_role: Option<String>,
    #[validate(range(min = 0, max = 70, message = "Years of experience is out of range"))]
    pub years_of_experience: Option<i32>,
    pub gender: Option<Option<String>>,
    pub work_setting: Option<WorkSetting>,
}

impl NewSalary {
    /// Inserts the entry after checking the author has a confirmed work
    /// email. Unverified users cannot contribute to the survey.
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Salary, DatabaseError> {
        self.validate()?;

        if !WorkEmail::has_confirmed(self.user_id, conn)? {
            return DatabaseError::business_process_error(
                "A confirmed work email is required before adding a salary",
            );
        }

        diesel::insert_into(salaries::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new salary")
    }
}

impl Salary {
    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Salary, DatabaseError> {
        salaries::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading salary")
    }

    pub fn find_for_user(user_id: Uuid, conn: &mut PgConnection) -> Result<Vec<Salary>, DatabaseError> {
        salaries::table
            .filter(salaries::user_id.eq(user_id))
            .order_by(salaries::created_at.desc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading salaries")
    }

    pub fn find_for_company(company_id: Uuid, conn: &mut PgConnection) -> Result<Vec<Salary>, DatabaseError> {
        salaries::table
            .filter(salaries::company_id.eq(company_id))
            .order_by(salaries::created_at.desc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading company salaries")
    }

    pub fn update(
        &self,
        attributes: SalaryEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<Salary, DatabaseError> {
        attributes.validate()?;

        diesel::update(self)
            .set((attributes, salaries::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update salary")
    }

    pub fn company(&self, conn: &mut PgConnection) -> Result<Company, DatabaseError> {
        Company::find(self.company_id, conn)
    }
}
