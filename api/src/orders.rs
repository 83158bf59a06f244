use crate::communications;
use crate::config::Config;
use crate::errors::ApiError;
use diesel::PgConnection;
use gather_db::prelude::*;

/// Applies a settlement result from a payment provider to an order. Marking
/// an order paid also queues the confirmation email; re-applying a state the
/// order is already in is a no-op so webhook and polling paths can race.
pub fn apply_payment_status(
    order: &PurchaseOrder,
    status: PaymentStatus,
    config: &Config,
    conn: &mut PgConnection,
) -> Result<PurchaseOrder, ApiError> {
    match status {
        PaymentStatus::Paid => {
            if order.payment_status == PaymentStatus::Paid {
                return Ok(order.clone());
            }
            let updated = order.mark_paid(conn)?;
            let user = updated.user(conn)?;
            communications::purchase_completed(&user, &updated, &config.communication_default_source_email)
                .queue(conn)?;
            Ok(updated)
        }
        PaymentStatus::Expired => Ok(order.mark_expired(conn)?),
        PaymentStatus::Cancelled => Ok(order.mark_cancelled(conn)?),
        _ => Ok(order.clone()),
    }
}
