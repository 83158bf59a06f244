use crate::models::enums::*;
use crate::models::{TicketTemplate, User, UserTicket};
use crate::schema::{purchase_orders, user_tickets};
use crate::utils::errors::ConvertToDatabaseError;
use crate::utils::errors::DatabaseError;
use crate::utils::errors::ErrorCode;
use chrono::NaiveDateTime;
use diesel::dsl;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Groups the tickets a user claimed in one checkout and tracks the order
/// through its payment lifecycle.
#[derive(Associations, Clone, Debug, Deserialize, Identifiable, PartialEq, Queryable, Serialize)]
#[diesel(belongs_to(User))]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_status: PaymentStatus,
    pub payment_platform: Option<PaymentPlatform>,
    pub payment_platform_reference_id: Option<String>,
    pub payment_link: Option<String>,
    pub total_price_in_cents: i64,
    pub currency: String,
    pub purchased_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = purchase_orders)]
pub struct NewPurchaseOrder {
    pub user_id: Uuid,
    pub payment_status: PaymentStatus,
    pub total_price_in_cents: i64,
    pub currency: String,
}

/// One line of a `claimUserTickets` request.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TicketClaim {
    pub ticket_template_id: Uuid,
    pub quantity: i64,
}

impl NewPurchaseOrder {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        diesel::insert_into(purchase_orders::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new purchase order")
    }
}

impl PurchaseOrder {
    /// Validates and claims the requested tickets in one transaction,
    /// producing the purchase order and its user tickets. Free orders need
    /// no payment and approve their tickets immediately; orders that require
    /// payment keep every ticket pending until the payment settles.
    pub fn claim(user: &User, claims: &[TicketClaim], conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        if claims.is_empty() {
            return DatabaseError::validation_error("purchases", "At least one ticket must be claimed");
        }

        conn.transaction(|conn| {
            let mut total: i64 = 0;
            let mut currency: Option<String> = None;
            let mut validated: Vec<(TicketTemplate, i64)> = Vec::with_capacity(claims.len());

            for claim in claims {
                let template = TicketTemplate::find(claim.ticket_template_id, conn)?;
                let event = template.event(conn)?;
                if !event.open_for_claims() {
                    return DatabaseError::business_process_error("Event is not open for ticket claims");
                }

                let claimed = template.claimed_count(conn)?;
                let claimed_by_user = template.claimed_count_for_user(user.id, conn)?;
                template.validate_claim(claimed, claimed_by_user, claim.quantity)?;

                match currency {
                    None => currency = Some(template.currency.clone()),
                    Some(ref c) if *c != template.currency => {
                        return DatabaseError::validation_error(
                            "currency",
                            "All tickets in an order must use the same currency",
                        );
                    }
                    _ => {}
                }

                total += template.price_in_cents * claim.quantity;
                validated.push((template, claim.quantity));
            }

            let currency = currency.ok_or_else(|| DatabaseError::new(ErrorCode::InvalidInput, None))?;
            let payment_status = if total == 0 {
                PaymentStatus::NotRequired
            } else {
                PaymentStatus::Unpaid
            };

            let order = NewPurchaseOrder {
                user_id: user.id,
                payment_status,
                total_price_in_cents: total,
                currency,
            }
            .commit(conn)?;

            let order_is_free = total == 0;
            for (template, quantity) in validated {
                let approval_status = PurchaseOrder::initial_approval_status(template.requires_approval, order_is_free);
                for _ in 0..quantity {
                    UserTicket::create(template.id, user.id, order.id, approval_status).commit(conn)?;
                }
            }

            Ok(order)
        })
    }

    /// Approval status a freshly claimed ticket starts in. Waitlist
    /// templates always gate on admin approval.
    pub fn initial_approval_status(requires_approval: bool, order_is_free: bool) -> TicketApprovalStatus {
        if requires_approval || !order_is_free {
            TicketApprovalStatus::Pending
        } else {
            TicketApprovalStatus::Approved
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        purchase_orders::table
            .find(id)
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading purchase order")
    }

    pub fn find_by_payment_reference(reference: &str, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        purchase_orders::table
            .filter(purchase_orders::payment_platform_reference_id.eq(reference))
            .first(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading purchase order by payment reference")
    }

    pub fn find_for_user(user_id: Uuid, conn: &mut PgConnection) -> Result<Vec<PurchaseOrder>, DatabaseError> {
        purchase_orders::table
            .filter(purchase_orders::user_id.eq(user_id))
            .order_by(purchase_orders::created_at.desc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading purchase orders")
    }

    /// Unpaid orders created before the cutoff, candidates for expiry.
    pub fn find_stale_unpaid(cutoff: NaiveDateTime, conn: &mut PgConnection) -> Result<Vec<PurchaseOrder>, DatabaseError> {
        purchase_orders::table
            .filter(purchase_orders::payment_status.eq(PaymentStatus::Unpaid))
            .filter(purchase_orders::created_at.lt(cutoff))
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading stale purchase orders")
    }

    pub fn tickets(&self, conn: &mut PgConnection) -> Result<Vec<UserTicket>, DatabaseError> {
        user_tickets::table
            .filter(user_tickets::purchase_order_id.eq(self.id))
            .order_by(user_tickets::created_at.asc())
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Error loading order tickets")
    }

    pub fn user(&self, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        User::find(self.user_id, conn)
    }

    pub fn requires_payment(&self) -> bool {
        self.payment_status == PaymentStatus::Unpaid
    }

    /// Transition guard. Re-applying the current status is allowed so that
    /// provider reconciliation stays idempotent; any other transition is
    /// only valid from `Unpaid`.
    pub fn can_transition_to(&self, status: PaymentStatus) -> Result<(), DatabaseError> {
        if self.payment_status == status || self.payment_status == PaymentStatus::Unpaid {
            return Ok(());
        }
        DatabaseError::business_process_error("Purchase order payment status is already finalised")
    }

    pub fn set_payment_reference(
        &self,
        platform: PaymentPlatform,
        reference_id: &str,
        payment_link: &str,
        conn: &mut PgConnection,
    ) -> Result<PurchaseOrder, DatabaseError> {
        if self.payment_status != PaymentStatus::Unpaid {
            return DatabaseError::business_process_error("Only unpaid purchase orders can take a payment reference");
        }

        diesel::update(self)
            .set((
                purchase_orders::payment_platform.eq(platform),
                purchase_orders::payment_platform_reference_id.eq(reference_id),
                purchase_orders::payment_link.eq(payment_link),
                purchase_orders::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not store payment reference")
    }

    /// Marks the order paid and approves its tickets, skipping tickets whose
    /// template gates on admin approval. Idempotent for already-paid orders.
    pub fn mark_paid(&self, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        if self.payment_status == PaymentStatus::Paid {
            return Ok(self.clone());
        }
        self.can_transition_to(PaymentStatus::Paid)?;

        conn.transaction(|conn| {
            let order: PurchaseOrder = diesel::update(self)
                .set((
                    purchase_orders::payment_status.eq(PaymentStatus::Paid),
                    purchase_orders::purchased_at.eq(dsl::now),
                    purchase_orders::updated_at.eq(dsl::now),
                ))
                .get_result(conn)
                .to_db_error(ErrorCode::UpdateError, "Could not mark purchase order paid")?;

            for ticket in order.tickets(conn)? {
                if ticket.approval_status != TicketApprovalStatus::Pending {
                    continue;
                }
                if ticket.template(conn)?.requires_approval {
                    continue;
                }
                ticket.approve(conn)?;
            }

            Ok(order)
        })
    }

    pub fn mark_expired(&self, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        self.finalise(PaymentStatus::Expired, conn)
    }

    pub fn mark_cancelled(&self, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        self.finalise(PaymentStatus::Cancelled, conn)
    }

    /// Terminal non-paid transition: the order closes and its live tickets
    /// are cancelled, releasing template stock.
    fn finalise(&self, status: PaymentStatus, conn: &mut PgConnection) -> Result<PurchaseOrder, DatabaseError> {
        if self.payment_status == status {
            return Ok(self.clone());
        }
        self.can_transition_to(status)?;

        conn.transaction(|conn| {
            let order: PurchaseOrder = diesel::update(self)
                .set((
                    purchase_orders::payment_status.eq(status),
                    purchase_orders::updated_at.eq(dsl::now),
                ))
                .get_result(conn)
                .to_db_error(ErrorCode::UpdateError, "Could not update purchase order status")?;

            for ticket in order.tickets(conn)? {
                if ticket.can_cancel().is_ok() && ticket.approval_status != TicketApprovalStatus::Rejected {
                    ticket.cancel(conn)?;
                }
            }

            Ok(order)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: PaymentStatus) -> PurchaseOrder {
        let now = chrono::Utc::now().naive_utc();
        PurchaseOrder {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            payment_status: status,
            payment_platform: None,
            payment_platform_reference_id: None,
            payment_link: None,
            total_price_in_cents: 50_00,
            currency: "USD".to_string(),
            purchased_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transitions_only_leave_unpaid() {
        let unpaid = order(PaymentStatus::Unpaid);
        assert!(unpaid.can_transition_to(PaymentStatus::Paid).is_ok());
        assert!(unpaid.can_transition_to(PaymentStatus::Expired).is_ok());
        assert!(unpaid.can_transition_to(PaymentStatus::Cancelled).is_ok());

        let paid = order(PaymentStatus::Paid);
        assert!(paid.can_transition_to(PaymentStatus::Expired).is_err());
        assert!(paid.can_transition_to(PaymentStatus::Cancelled).is_err());

        let expired = order(PaymentStatus::Expired);
        assert!(expired.can_transition_to(PaymentStatus::Paid).is_err());
    }

    #[test]
    fn reapplying_current_status_is_idempotent() {
        let paid = order(PaymentStatus::Paid);
        assert!(paid.can_transition_to(PaymentStatus::Paid).is_ok());

        let cancelled = order(PaymentStatus::Cancelled);
        assert!(cancelled.can_transition_to(PaymentStatus::Cancelled).is_ok());
    }

    #[test]
    fn initial_approval_status_rules() {
        // Waitlist templates always start pending
        assert_eq!(
            PurchaseOrder::initial_approval_status(true, true),
            TicketApprovalStatus::Pending
        );
        assert_eq!(
            PurchaseOrder::initial_approval_status(true, false),
            TicketApprovalStatus::Pending
        );
        // Paid orders hold approval until the payment settles
        assert_eq!(
            PurchaseOrder::initial_approval_status(false, false),
            TicketApprovalStatus::Pending
        );
        // Free, non-gated tickets are approved at claim time
        assert_eq!(
            PurchaseOrder::initial_approval_status(false, true),
            TicketApprovalStatus::Approved
        );
    }

    #[test]
    fn requires_payment_only_when_unpaid() {
        assert!(order(PaymentStatus::Unpaid).requires_payment());
        assert!(!order(PaymentStatus::Paid).requires_payment());
        assert!(!order(PaymentStatus::NotRequired).requires_payment());
    }
}
