use crate::graphql::enums;
use crate::graphql::inputs::*;
use crate::graphql::objects::*;
use crate::graphql::{auth_user, connection};
use async_graphql::{Context, Object, Result};
use gather_db::prelude::*;
use uuid::Uuid;

pub struct Query;

#[Object]
impl Query {
    /// The authenticated caller's profile.
    async fn me(&self, ctx: &Context<'_>) -> Result<DisplayUser> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        Ok(DisplayUser(user.user))
    }

    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUser> {
        let mut conn = connection(ctx)?;
        auth_user(ctx, &mut conn)?;
        Ok(DisplayUser(User::find(id, &mut conn)?))
    }

    /// Fuzzy user search over email, name and username. Admin only.
    async fn users(&self, ctx: &Context<'_>, query: String) -> Result<Vec<DisplayUser>> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_admin()?;
        let users = User::search(&query, 50, &mut conn)?;
        Ok(users.into_iter().map(DisplayUser).collect())
    }

    async fn community(&self, ctx: &Context<'_>, id: Option<Uuid>, slug: Option<String>) -> Result<DisplayCommunity> {
        let mut conn = connection(ctx)?;
        let community = match (id, slug) {
            (Some(id), _) => Community::find(id, &mut conn)?,
            (None, Some(slug)) => Community::find_by_slug(&slug, &mut conn)?,
            (None, None) => {
                return Err(async_graphql::Error::new("Either id or slug must be provided"));
            }
        };
        Ok(DisplayCommunity(community))
    }

    async fn communities(
        &self,
        ctx: &Context<'_>,
        status: Option<enums::CommunityStatus>,
    ) -> Result<Vec<DisplayCommunity>> {
        let mut conn = connection(ctx)?;
        let status = status.map(Into::into).unwrap_or(CommunityStatus::Active);
        let communities = Community::find_all(Some(status), &mut conn)?;
        Ok(communities.into_iter().map(DisplayCommunity).collect())
    }

    async fn event(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayEvent> {
        let mut conn = connection(ctx)?;
        let event = Event::find(id, &mut conn)?;
        if !event.publicly_visible() {
            // Drafts and private events are only visible to their organizers
            let user = auth_user(ctx, &mut conn)?;
            user.require_organizer(event.community_id, &mut conn)?;
        }
        Ok(DisplayEvent(event))
    }

    async fn events(&self, ctx: &Context<'_>, search: Option<EventSearchInput>) -> Result<Vec<DisplayEvent>> {
        let mut conn = connection(ctx)?;
        let parameters = search.map(|s| s.into_parameters()).unwrap_or_default();

        let organizer_scope = match parameters.community_id {
            Some(community_id) => match auth_user(ctx, &mut conn) {
                Ok(user) => user.is_organizer(community_id, &mut conn)?,
                Err(_) => false,
            },
            None => false,
        };

        let mut events = Event::search(&parameters, &mut conn)?;
        if !organizer_scope {
            events.retain(|e| e.publicly_visible());
        }
        Ok(events.into_iter().map(DisplayEvent).collect())
    }

    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<DisplayTag>> {
        let mut conn = connection(ctx)?;
        Ok(Tag::find_all(&mut conn)?.into_iter().map(DisplayTag).collect())
    }

    /// A single ticket, visible to its owner and to organizers of its
    /// event's community.
    async fn ticket(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        if ticket.user_id != user.id() {
            let event = ticket.template(&mut conn)?.event(&mut conn)?;
            user.require_organizer(event.community_id, &mut conn)?;
        }
        Ok(DisplayUserTicket(ticket))
    }

    async fn my_tickets(
        &self,
        ctx: &Context<'_>,
        filters: Option<UserTicketFilterInput>,
    ) -> Result<Vec<DisplayUserTicket>> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let filters = filters.map(|f| f.into_filters()).unwrap_or_default();
        let tickets = UserTicket::find_for_user(user.id(), &filters, &mut conn)?;
        Ok(tickets.into_iter().map(DisplayUserTicket).collect())
    }

    async fn my_purchase_orders(&self, ctx: &Context<'_>) -> Result<Vec<DisplayPurchaseOrder>> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let orders = PurchaseOrder::find_for_user(user.id(), &mut conn)?;
        Ok(orders.into_iter().map(DisplayPurchaseOrder).collect())
    }

    async fn purchase_order(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayPurchaseOrder> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let order = PurchaseOrder::find(id, &mut conn)?;
        if order.user_id != user.id() && !user.is_admin() {
            return Err(DatabaseError::new(ErrorCode::AccessError, Some("Purchase order belongs to another user".to_string())).into());
        }
        Ok(DisplayPurchaseOrder(order))
    }

    async fn company(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayCompany> {
        let mut conn = connection(ctx)?;
        Ok(DisplayCompany(Company::find(id, &mut conn)?))
    }

    async fn companies(&self, ctx: &Context<'_>, query: Option<String>) -> Result<Vec<DisplayCompany>> {
        let mut conn = connection(ctx)?;
        let companies = Company::find_all(query.as_deref(), &mut conn)?;
        Ok(companies.into_iter().map(DisplayCompany).collect())
    }

    async fn my_work_emails(&self, ctx: &Context<'_>) -> Result<Vec<DisplayWorkEmail>> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let work_emails = WorkEmail::find_for_user(user.id(), &mut conn)?;
        Ok(work_emails.into_iter().map(DisplayWorkEmail).collect())
    }

    async fn my_salaries(&self, ctx: &Context<'_>) -> Result<Vec<DisplaySalary>> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let salaries = Salary::find_for_user(user.id(), &mut conn)?;
        Ok(salaries.into_iter().map(DisplaySalary).collect())
    }
}
