use crate::models::enums::*;
use crate::models::{PurchaseOrder, TicketTemplate, User};
use crate::schema::user_tickets;
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(TicketTemplate))]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(PurchaseOrder))]
pub struct UserTicket {
    pub id: Uuid,
    pub ticket_template_id: Uuid,
    pub user_id: Uuid,
    pub purchase_order_id: Uuid,
    pub approval_status: TicketApprovalStatus,
    pub redemption_status: TicketRedemptionStatus,
    pub gift_recipient_email: Option<String>,
    pub redeemed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = user_tickets)]
pub struct NewUserTicket {
    pub ticket_template_id: Uuid,
    pub user_id: Uuid,
    pub purchase_order_id: Uuid,
    pub approval_status: TicketApprovalStatus,
    pub redemption_status: TicketRedemptionStatus,
}

#[derive(Default)]
pub struct UserTicketFilters {
    pub event_id: Option<Uuid>,
    pub approval_status: Option<TicketApprovalStatus>,
}

impl NewUserTicket {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        diesel::insert_into(user_tickets::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new user ticket")
    }
}

impl UserTicket {
    pub fn create(
        ticket_template_id: Uuid,
        user_id: Uuid,
        purchase_order_id: Uuid,
        approval_status: TicketApprovalStatus,
    ) -> NewUserTicket {
        NewUserTicket {
            ticket_template_id,
            user_id,
            purchase_order_id,
            approval_status,
            redemption_status: TicketRedemptionStatus::Pending,
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        user_tickets::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading user ticket")
    }

    pub fn find_for_user(
        user_id: Uuid,
        filters: &UserTicketFilters,
        conn: &mut PgConnection,
    ) -> Result<Vec<UserTicket>, DatabaseError> {
        use crate::schema::ticket_templates;

        let mut query = user_tickets::table
            .inner_join(ticket_templates::table)
            .filter(user_tickets::user_id.eq(user_id))
            .select(user_tickets::all_columns)
            .order_by(user_tickets::created_at.desc())
            .into_boxed();

        if let Some(event_id) = filters.event_id {
            query = query.filter(ticket_templates::event_id.eq(event_id));
        }
        if let Some(approval_status) = filters.approval_status {
            query = query.filter(user_tickets::approval_status.eq(approval_status));
        }

        query
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading user tickets")
    }

    pub fn find_pending_for_template(
        ticket_template_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<Vec<UserTicket>, DatabaseError> {
        user_tickets::table
            .filter(user_tickets::ticket_template_id.eq(ticket_template_id))
            .filter(user_tickets::approval_status.eq(TicketApprovalStatus::Pending))
            .order_by(user_tickets::created_at.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading pending tickets")
    }

    pub fn template(&self, conn: &mut PgConnection) -> Result<TicketTemplate, DatabaseError> {
        TicketTemplate::find(self.ticket_template_id, conn)
    }

    pub fn owner(&self, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        User::find(self.user_id, conn)
    }

    pub fn purchase_order(&self, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        PurchaseOrder::find(self.purchase_order_id, conn)
    }

    pub fn can_redeem(&self) -> Result<(), DatabaseError> {
        if self.redemption_status == TicketRedemptionStatus::Redeemed {
            return DatabaseError::business_process_error("Ticket has already been redeemed");
        }
        if !self.approval_status.is_redeemable() {
            return DatabaseError::business_process_error("Only approved tickets can be redeemed");
        }
        Ok(())
    }

    pub fn redeem(&self, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        self.can_redeem()?;

        diesel::update(self)
            .set((
                user_tickets::redemption_status.eq(TicketRedemptionStatus::Redeemed),
                user_tickets::redeemed_at.eq(dsl::now),
                user_tickets::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not redeem ticket")
    }

    pub fn can_cancel(&self) -> Result<(), DatabaseError> {
        if self.redemption_status == TicketRedemptionStatus::Redeemed {
            return DatabaseError::business_process_error("A redeemed ticket cannot be cancelled");
        }
        if self.approval_status == TicketApprovalStatus::Cancelled {
            return DatabaseError::business_process_error("Ticket is already cancelled");
        }
        Ok(())
    }

    pub fn cancel(&self, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        self.can_cancel()?;
        self.set_approval_status(TicketApprovalStatus::Cancelled, conn)
    }

    pub fn approve(&self, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        if self.approval_status != TicketApprovalStatus::Pending {
            return DatabaseError::business_process_error("Only pending tickets can be approved");
        }
        self.set_approval_status(TicketApprovalStatus::Approved, conn)
    }

    pub fn reject(&self, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        if self.approval_status != TicketApprovalStatus::Pending {
            return DatabaseError::business_process_error("Only pending tickets can be rejected");
        }
        self.set_approval_status(TicketApprovalStatus::Rejected, conn)
    }

    pub fn can_gift(&self) -> Result<(), DatabaseError> {
        if self.redemption_status == TicketRedemptionStatus::Redeemed {
            return DatabaseError::business_process_error("A redeemed ticket cannot be gifted");
        }
        if self.approval_status != TicketApprovalStatus::Approved {
            return DatabaseError::business_process_error("Only approved tickets can be gifted");
        }
        Ok(())
    }

    pub fn gift(&self, recipient_email: &str, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        self.can_gift()?;

        diesel::update(self)
            .set((
                user_tickets::approval_status.eq(TicketApprovalStatus::Gifted),
                user_tickets::gift_recipient_email.eq(recipient_email),
                user_tickets::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not gift ticket")
    }

    pub fn can_accept_gift(&self, recipient: &User) -> Result<(), DatabaseError> {
        if self.approval_status != TicketApprovalStatus::Gifted {
            return DatabaseError::business_process_error("Ticket is not awaiting a gift acceptance");
        }
        match self.gift_recipient_email {
            Some(ref email) if email.eq_ignore_ascii_case(&recipient.email) => Ok(()),
            _ => Err(DatabaseError::new(
                ErrorCode::AccessError,
                Some("Ticket was gifted to a different recipient".to_string()),
            )),
        }
    }

    /// Moves ownership of a gifted ticket to the accepting user.
    pub fn accept_gift(&self, recipient: &User, conn: &mut PgConnection) -> Result<UserTicket, DatabaseError> {
        self.can_accept_gift(recipient)?;

        diesel::update(self)
            .set((
                user_tickets::approval_status.eq(TicketApprovalStatus::GiftAccepted),
                user_tickets::user_id.eq(recipient.id),
                user_tickets::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not accept gifted ticket")
    }

    fn set_approval_status(
        &self,
        status: TicketApprovalStatus,
        conn: &mut PgConnection,
    ) -> Result<UserTicket, DatabaseError> {
        diesel::update(self)
            .set((
                user_tickets::approval_status.eq(status),
                user_tickets::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update ticket approval status")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(approval: TicketApprovalStatus, redemption: TicketRedemptionStatus) -> UserTicket {
        let now = chrono::Utc::now().naive_utc();
        UserTicket {
            id: Uuid::new_v4(),
            ticket_template_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            purchase_order_id: Uuid::new_v4(),
            approval_status: approval,
            redemption_status: redemption,
            gift_recipient_email: None,
            redeemed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn recipient(email: &str) -> User {
        let now = chrono::Utc::now().naive_utc();
        User {
            id: Uuid::new_v4(),
            sub: "auth0|recipient".to_string(),
            email: email.to_string(),
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
    fn redeem_requires_approval() {
        assert!(ticket(TicketApprovalStatus::Approved, TicketRedemptionStatus::Pending)
            .can_redeem()
            .is_ok());
        assert!(ticket(TicketApprovalStatus::GiftAccepted, TicketRedemptionStatus::Pending)
            .can_redeem()
            .is_ok());
        assert!(ticket(TicketApprovalStatus::Pending, TicketRedemptionStatus::Pending)
            .can_redeem()
            .is_err());
        assert!(ticket(TicketApprovalStatus::Gifted, TicketRedemptionStatus::Pending)
            .can_redeem()
            .is_err());
    }

    #[test]
    fn redeem_is_single_use() {
        let t = ticket(TicketApprovalStatus::Approved, TicketRedemptionStatus::Redeemed);
        assert!(t.can_redeem().is_err());
    }

    #[test]
    fn gift_only_from_approved() {
        assert!(ticket(TicketApprovalStatus::Approved, TicketRedemptionStatus::Pending)
            .can_gift()
            .is_ok());
        assert!(ticket(TicketApprovalStatus::Pending, TicketRedemptionStatus::Pending)
            .can_gift()
            .is_err());
        assert!(ticket(TicketApprovalStatus::Approved, TicketRedemptionStatus::Redeemed)
            .can_gift()
            .is_err());
        assert!(ticket(TicketApprovalStatus::GiftAccepted, TicketRedemptionStatus::Pending)
            .can_gift()
            .is_err());
    }

    #[test]
    fn gift_acceptance_checks_recipient() {
        let mut t = ticket(TicketApprovalStatus::Gifted, TicketRedemptionStatus::Pending);
        t.gift_recipient_email = Some("friend@example.com".to_string());

        assert!(t.can_accept_gift(&recipient("friend@example.com")).is_ok());
        // Email comparison is case-insensitive
        assert!(t.can_accept_gift(&recipient("Friend@Example.com")).is_ok());
        assert!(t.can_accept_gift(&recipient("stranger@example.com")).is_err());
    }

    #[test]
    fn gift_acceptance_requires_gifted_status() {
        let mut t = ticket(TicketApprovalStatus::Approved, TicketRedemptionStatus::Pending);
        t.gift_recipient_email = Some("friend@example.com".to_string());
        assert!(t.can_accept_gift(&recipient("friend@example.com")).is_err());
    }

    #[test]
    fn cancelled_tickets_cannot_cancel_again() {
        assert!(ticket(TicketApprovalStatus::Pending, TicketRedemptionStatus::Pending)
            .can_cancel()
            .is_ok());
        assert!(ticket(TicketApprovalStatus::Cancelled, TicketRedemptionStatus::Pending)
            .can_cancel()
            .is_err());
        assert!(ticket(TicketApprovalStatus::Approved, TicketRedemptionStatus::Redeemed)
            .can_cancel()
            .is_err());
    }
}
