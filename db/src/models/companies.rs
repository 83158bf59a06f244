use crate::models::enums::*;
use crate::schema::companies;
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

/// An employer referenced by salary entries, keyed by its email domain.
#[derive(Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(table_name = companies)]
pub struct Company {
    pub id: Uuid,
    pub name: Option<String>,
    pub domain: String,
    pub logo_url: Option<String>,
    pub status: CompanyStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = companies)]
pub struct NewCompany {
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Domain cannot be blank"))]
    pub domain: String,
    #[validate(url(message = "Logo URL is invalid"))]
    pub logo_url: Option<String>,
    pub status: CompanyStatus,
}

#[derive(AsChangeset, Default, Deserialize, Validate)]
#[diesel(table_name = companies)]
pub struct CompanyEditableAttributes {
    pub name: Option<String>,
    #[validate(url(message = "Logo URL is invalid"))]
    pub logo_url: Option<String>,
    pub status: Option<CompanyStatus>,
}

impl NewCompany {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<Company, DatabaseError> {
        self.validate()?;

        diesel::insert_into(companies::table)
            .values((
                companies::name.eq(&self.name),
                companies::domain.eq(self.domain.to_lowercase()),
                companies::logo_url.eq(&self.logo_url),
                companies::status.eq(self.status),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new company")
    }
}

impl Company {
    pub fn create(name: Option<String>, domain: &str) -> NewCompany {
        NewCompany {
            name,
            domain: domain.to_string(),
            logo_url: None,
            status: CompanyStatus::Active,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<Company, DatabaseError> {
        companies::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading company")
    }

    /// Domains are stored lowercased, so lookups fold case too.
    pub fn find_by_domain(domain: &str, conn: &mut PgConnection) -> Result<Option<Company>, DatabaseError> {
        companies::table
            .filter(companies::domain.eq(domain.to_lowercase()))
            .first::<Company>(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading company by domain")
            .optional()
    }

    /// Finds the company for a domain, creating a placeholder record when
    /// none exists yet.
    pub fn find_or_create_by_domain(domain: &str, conn: &mut PgConnection) -> Result<Company, DatabaseError> {
        match Company::find_by_domain(domain, conn)? {
            Some(company) => Ok(company),
            None => Company::create(None, domain).commit(conn),
        }
    }

    pub fn find_all(query: Option<&str>, conn: &mut PgConnection) -> Result<Vec<Company>, DatabaseError> {
        let mut companies_query = companies::table
            .filter(companies::status.eq(CompanyStatus::Active))
            .into_boxed();

        if let Some(query) = query {
            let fuzzy = format!("%{}%", query);
            companies_query = companies_query.filter(
                companies::name
                    .ilike(fuzzy.clone())
                    .or(companies::domain.ilike(fuzzy)),
            );
        }

        companies_query
            .order_by(companies::domain.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading companies")
    }

    pub fn update(
        &self,
        attributes: CompanyEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<Company, DatabaseError> {
        attributes.validate()?;

        diesel::update(self)
            .set((attributes, companies::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update company")
    }
}
