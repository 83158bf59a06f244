use crate::models::enums::*;
use crate::models::Event;
use crate::schema::{ticket_templates, user_tickets};
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A ticket definition users can claim against an event. A template with
/// `requires_approval` acts as a waitlist: claimed tickets stay pending until
/// a community admin admits them.
#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(Event))]
pub struct TicketTemplate {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: TicketTemplateStatus,
    pub visibility: Visibility,
    pub quantity: Option<i64>,
    pub max_per_user: Option<i64>,
    pub price_in_cents: i64,
    pub currency: String,
    pub requires_approval: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Validate)]
#[diesel(table_name = ticket_templates)]
pub struct NewTicketTemplate {
    pub event_id: Uuid,
    #[validate(length(min = 1, message = "Name cannot be blank"))]
    pub name: String,
    pub description: Option<String>,
    pub status: TicketTemplateStatus,
    pub visibility: Visibility,
    pub quantity: Option<i64>,
    pub max_per_user: Option<i64>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_in_cents: i64,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3 letter code"))]
    pub currency: String,
    pub requires_approval: bool,
}

#[derive(AsChangeset, Default, Deserialize, Validate)]
#[diesel(table_name = ticket_templates)]
pub struct TicketTemplateEditableAttributes {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketTemplateStatus>,
    pub visibility: Option<Visibility>,
    pub quantity: Option<Option<i64>>,
    pub max_per_user: Option<Option<i64>>,
    pub price_in_cents: Option<i64>,
}

impl NewTicketTemplate {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<TicketTemplate, DatabaseError> {
        self.validate()?;

        diesel::insert_into(ticket_templates::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new ticket template")
    }
}

impl TicketTemplate {
    pub fn create(event_id: Uuid, name: &str, price_in_cents: i64, currency: &str) -> NewTicketTemplate {
        NewTicketTemplate {
            event_id,
            name: name.to_string(),
            description: None,
            status: TicketTemplateStatus::Active,
            visibility: Visibility::Public,
            quantity: None,
            max_per_user: None,
            price_in_cents,
            currency: currency.to_string(),
            requires_approval: false,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<TicketTemplate, DatabaseError> {
        ticket_templates::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading ticket template")
    }

    pub fn find_for_event(event_id: Uuid, conn: &mut PgConnection) -> Result<Vec<TicketTemplate>, DatabaseError> {
        ticket_templates::table
            .filter(ticket_templates::event_id.eq(event_id))
            .order_by(ticket_templates::created_at.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading ticket templates")
    }

    pub fn update(
        &self,
        attributes: TicketTemplateEditableAttributes,
        conn: &mut PgConnection,
    ) -> Result<TicketTemplate, DatabaseError> {
        attributes.validate()?;

        diesel::update(self)
            .set((attributes, ticket_templates::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update ticket template")
    }

    pub fn event(&self, conn: &mut PgConnection) -> Result<Event, DatabaseError> {
        Event::find(self.event_id, conn)
    }

    /// Tickets counted against the template quantity. Rejected and cancelled
    /// tickets release their spot.
    pub fn claimed_count(&self, conn: &mut PgConnection) -> Result<i64, DatabaseError> {
        user_tickets::table
            .filter(user_tickets::ticket_template_id.eq(self.id))
            .filter(user_tickets::approval_status.ne_all(vec![
                TicketApprovalStatus::Rejected,
                TicketApprovalStatus::Cancelled,
            ]))
            .select(dsl::count(user_tickets::id))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Error counting claimed tickets")
    }

    pub fn claimed_count_for_user(&self, user_id: Uuid, conn: &mut PgConnection) -> Result<i64, DatabaseError> {
        user_tickets::table
            .filter(user_tickets::ticket_template_id.eq(self.id))
            .filter(user_tickets::user_id.eq(user_id))
            .filter(user_tickets::approval_status.ne_all(vec![
                TicketApprovalStatus::Rejected,
                TicketApprovalStatus::Cancelled,
            ]))
            .select(dsl::count(user_tickets::id))
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Error counting user tickets")
    }

    pub fn is_free(&self) -> bool {
        self.price_in_cents == 0
    }

    /// Stock and per-user limits for a claim of `requested` tickets, given
    /// the current claimed counts.
    pub fn validate_claim(&self, claimed: i64, claimed_by_user: i64, requested: i64) -> Result<(), DatabaseError> {
        if requested < 1 {
            return DatabaseError::validation_error("quantity", "Quantity must be at least one");
        }
        if self.status != TicketTemplateStatus::Active {
            return DatabaseError::business_process_error("Ticket template is not active");
        }
        if self.visibility == Visibility::Private {
            return DatabaseError::business_process_error("Ticket template is not on sale");
        }
        if let Some(quantity) = self.quantity {
            if claimed + requested > quantity {
                return DatabaseError::business_process_error("Not enough tickets remaining");
            }
        }
        if let Some(max_per_user) = self.max_per_user {
            if claimed_by_user + requested > max_per_user {
                return DatabaseError::business_process_error("Claim exceeds the per user ticket limit");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(quantity: Option<i64>, max_per_user: Option<i64>) -> TicketTemplate {
        let now = chrono::Utc::now().naive_utc();
        TicketTemplate {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "General Admission".to_string(),
            description: None,
            status: TicketTemplateStatus::Active,
            visibility: Visibility::Public,
            quantity,
            max_per_user,
            price_in_cents: 25_00,
            currency: "USD".to_string(),
            requires_approval: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn claim_requires_positive_quantity() {
        let t = template(None, None);
        assert!(t.validate_claim(0, 0, 0).is_err());
        assert!(t.validate_claim(0, 0, 1).is_ok());
    }

    #[test]
    fn claim_respects_stock() {
        let t = template(Some(10), None);
        assert!(t.validate_claim(8, 0, 2).is_ok());
        assert!(t.validate_claim(9, 0, 2).is_err());
        // Unlimited template never sells out
        let t = template(None, None);
        assert!(t.validate_claim(1_000_000, 0, 50).is_ok());
    }

    #[test]
    fn claim_respects_per_user_limit() {
        let t = template(None, Some(2));
        assert!(t.validate_claim(0, 1, 1).is_ok());
        assert!(t.validate_claim(0, 1, 2).is_err());
    }

    #[test]
    fn claim_rejects_private_template() {
        let t = TicketTemplate {
            visibility: Visibility::Private,
            ..template(None, None)
        };
        assert!(t.validate_claim(0, 0, 1).is_err());

        // Unlisted templates are claimable by anyone holding the link
        let t = TicketTemplate {
            visibility: Visibility::Unlisted,
            ..template(None, None)
        };
        assert!(t.validate_claim(0, 0, 1).is_ok());
    }

    #[test]
    fn claim_rejects_inactive_template() {
        let t = TicketTemplate {
            status: TicketTemplateStatus::Inactive,
            ..template(None, None)
        };
        assert!(t.validate_claim(0, 0, 1).is_err());
    }

    #[test]
    fn free_templates() {
        let t = TicketTemplate {
            price_in_cents: 0,
            ..template(None, None)
        };
        assert!(t.is_free());
        assert!(!template(None, None).is_free());
    }
}
