use crate::graphql::connection;
use crate::graphql::enums;
use crate::graphql::objects::{DisplayEvent, DisplayPurchaseOrder};
use async_graphql::{Context, Object, Result};
use chrono::NaiveDateTime;
use gather_db::prelude::*;
use uuid::Uuid;

pub struct DisplayTicketTemplate(pub TicketTemplate);

#[Object(name = "TicketTemplate")]
impl DisplayTicketTemplate {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn status(&self) -> enums::TicketTemplateStatus {
        self.0.status.into()
    }

    async fn visibility(&self) -> enums::Visibility {
        self.0.visibility.into()
    }

    /// Total stock; null means unlimited.
    async fn quantity(&self) -> Option<i64> {
        self.0.quantity
    }

    async fn max_per_user(&self) -> Option<i64> {
        self.0.max_per_user
    }

    async fn price_in_cents(&self) -> i64 {
        self.0.price_in_cents
    }

    async fn currency(&self) -> &str {
        &self.0.currency
    }

    async fn is_free(&self) -> bool {
        self.0.is_free()
    }

    /// Waitlist behaviour: claimed tickets need organizer approval.
    async fn requires_approval(&self) -> bool {
        self.0.requires_approval
    }

    async fn claimed_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let mut conn = connection(ctx)?;
        Ok(self.0.claimed_count(&mut conn)?)
    }

    async fn remaining(&self, ctx: &Context<'_>) -> Result<Option<i64>> {
        match self.0.quantity {
            None => Ok(None),
            Some(quantity) => {
                let mut conn = connection(ctx)?;
                let claimed = self.0.claimed_count(&mut conn)?;
                Ok(Some((quantity - claimed).max(0)))
            }
        }
    }

    async fn event(&self, ctx: &Context<'_>) -> Result<DisplayEvent> {
        let mut conn = connection(ctx)?;
        Ok(DisplayEvent(self.0.event(&mut conn)?))
    }
}

pub struct DisplayUserTicket(pub UserTicket);

#[Object(name = "UserTicket")]
impl DisplayUserTicket {
    async fn id(&self) -> Uuid {
        self.0.id
    }

    async fn approval_status(&self) -> enums::TicketApprovalStatus {
        self.0.approval_status.into()
    }

    async fn redemption_status(&self) -> enums::TicketRedemptionStatus {
        self.0.redemption_status.into()
    }

    async fn gift_recipient_email(&self) -> Option<&str> {
        self.0.gift_recipient_email.as_deref()
    }

    async fn redeemed_at(&self) -> Option<NaiveDateTime> {
        self.0.redeemed_at
    }

    async fn ticket_template(&self, ctx: &Context<'_>) -> Result<DisplayTicketTemplate> {
        let mut conn = connection(ctx)?;
        Ok(DisplayTicketTemplate(self.0.template(&mut conn)?))
    }

    async fn event(&self, ctx: &Context<'_>) -> Result<DisplayEvent> {
        let mut conn = connection(ctx)?;
        let template = self.0.template(&mut conn)?;
        Ok(DisplayEvent(template.event(&mut conn)?))
    }

    async fn purchase_order(&self, ctx: &Context<'_>) -> Result<DisplayPurchaseOrder> {
        let mut conn = connection(ctx)?;
        Ok(DisplayPurchaseOrder(self.0.purchase_order(&mut conn)?))
    }

    async fn created_at(&self) -> NaiveDateTime {
        self.0.created_at
    }
}
