use crate::graphql::connection;
use crate::graphql::enums;
use crate::graphql::objects::DisplayUserTicket;
use async_graphql::{Context, Object, Result};
use chrono::NaiveDateTime;
use gather_db::prelude::*;
use uuid::Uuid;

pub struct DisplayPurchaseOrder(pub PurchaseOrder);

#[Object(name = "PurchaseOrder")]
impl DisplayPurchaseOrder {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn payment_status(&self) -> enums::PaymentStatus {
        self.0.payment_status.into()
    }

    async fn payment_platform(&self) -> Option<enums::PaymentPlatform> {
        self.0.payment_platform.map(Into::into)
    }

    /// The hosted checkout page the customer pays through.
    async fn payment_link(&self) -> Option<&str> {
        self.0.payment_link.as_deref()
    }

    async fn total_price_in_cents(&self) -> i64 {
        self.0.total_price_in_cents
    }

    async fn currency(&self) -> &str {
        &self.0.currency
    }

    async fn purchased_at(&self) -> Option<NaiveDateTime> {
        self.0.purchased_at
    }

    async fn tickets(&self, ctx: &Context<'_>) -> Result<Vec<DisplayUserTicket>> {
        let mut conn = connection(ctx)?;
        Ok(self.0.tickets(&mut conn)?.into_iter().map(DisplayUserTicket).collect())
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }
}
