use crate::communications;
use crate::config::Config;
use crate::domain_events::executors::import_event_image::ImportEventImagePayload;
use crate::graphql::enums;
use crate::graphql::inputs::*;
use crate::graphql::objects::*;
use crate::graphql::{auth_user, connection};
use crate::orders;
use crate::payments::PaymentProviders;
use async_graphql::{Context, Object, Result};
use chrono::{Duration, Utc};
use gather_db::prelude::*;
use log::Level::Warn;
use std::sync::Arc;
use uuid::Uuid;

const LOG_TARGET: &str = "gather::mutations";

pub struct Mutation;

#[Object]
impl Mutation {
    async fn update_user(&self, ctx: &Context<'_>, input: UserUpdateInput) -> Result<DisplayUser> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        Ok(DisplayUser(user.user.update(input.into_attributes(), &mut conn)?))
    }

    /// Creates a community with the caller as its first admin. Communities
    /// are curated, so only site admins can add them.
    async fn create_community(&self, ctx: &Context<'_>, input: CommunityCreateInput) -> Result<DisplayCommunity> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_admin()?;
        let community = input.into_new_community().commit(&mut conn)?;
        CommunityMember::create(community.id, user.id(), CommunityRole::Admin).commit(&mut conn)?;
        Ok(DisplayCommunity(community))
    }

    async fn update_community(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: CommunityUpdateInput,
    ) -> Result<DisplayCommunity> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_community_admin(id, &mut conn)?;
        let community = Community::find(id, &mut conn)?;
        Ok(DisplayCommunity(community.update(input.into_attributes(), &mut conn)?))
    }

    /// Grants or changes a member's role. Adds the user to the community
    /// when they are not a member yet.
    async fn update_community_member_role(
        &self,
        ctx: &Context<'_>,
        community_id: Uuid,
        user_id: Uuid,
        role: enums::CommunityRole,
    ) -> Result<DisplayCommunityMember> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_community_admin(community_id, &mut conn)?;

        let member = match CommunityMember::find_by_community_and_user(community_id, user_id, &mut conn).optional()? {
            Some(member) => member.update_role(role.into(), &mut conn)?,
            None => CommunityMember::create(community_id, user_id, role.into()).commit(&mut conn)?,
        };
        Ok(DisplayCommunityMember(member))
    }

    async fn create_event(&self, ctx: &Context<'_>, input: EventCreateInput) -> Result<DisplayEvent> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_organizer(input.community_id, &mut conn)?;
        Ok(DisplayEvent(input.into_new_event().commit(&mut conn)?))
    }

    async fn update_event(&self, ctx: &Context<'_>, id: Uuid, input: EventUpdateInput) -> Result<DisplayEvent> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let event = Event::find(id, &mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;
        Ok(DisplayEvent(event.update(input.into_attributes(), &mut conn)?))
    }

    async fn create_session(&self, ctx: &Context<'_>, input: SessionCreateInput) -> Result<DisplaySession> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let event = Event::find(input.event_id, &mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;
        Ok(DisplaySession(input.into_new_session().commit(&mut conn)?))
    }

    /// Attaches a tag to an event, creating the tag on first use.
    async fn tag_event(&self, ctx: &Context<'_>, event_id: Uuid, tag_name: String) -> Result<DisplayEvent> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let event = Event::find(event_id, &mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;

        let tag = match Tag::find_by_name(&tag_name, &mut conn).optional()? {
            Some(tag) => tag,
            None => Tag::create(&tag_name, None).commit(&mut conn)?,
        };
        event.add_tag(tag.id, &mut conn)?;
        Ok(DisplayEvent(event))
    }

    /// Queues a background import of an externally hosted image into the
    /// media library. Returns false when an import is already pending.
    async fn enqueue_event_image_import(&self, ctx: &Context<'_>, event_id: Uuid, source_url: String) -> Result<bool> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let event = Event::find(event_id, &mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;

        if DomainAction::has_pending_action(
            DomainActionTypes::ImportEventImage,
            Some("events".to_string()),
            Some(event.id),
            &mut conn,
        )? {
            return Ok(false);
        }

        let payload = ImportEventImagePayload {
            event_id: event.id,
            source_url,
        };
        DomainAction::create(
            DomainActionTypes::ImportEventImage,
            serde_json::to_value(&payload)?,
            Some("events".to_string()),
            Some(event.id),
            Utc::now().naive_utc(),
            Utc::now().naive_utc() + Duration::days(1),
            3,
        )
        .commit(&mut conn)?;
        Ok(true)
    }

    async fn create_ticket_template(
        &self,
        ctx: &Context<'_>,
        input: TicketTemplateCreateInput,
    ) -> Result<DisplayTicketTemplate> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let event = Event::find(input.event_id, &mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;
        Ok(DisplayTicketTemplate(input.into_new_ticket_template().commit(&mut conn)?))
    }

    async fn update_ticket_template(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: TicketTemplateUpdateInput,
    ) -> Result<DisplayTicketTemplate> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let template = TicketTemplate::find(id, &mut conn)?;
        let event = template.event(&mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;
        Ok(DisplayTicketTemplate(template.update(input.into_attributes(), &mut conn)?))
    }

    /// Claims tickets across one or more templates, producing a purchase
    /// order. Free orders settle immediately; paid orders stay unpaid until
    /// a checkout completes.
    async fn claim_user_tickets(
        &self,
        ctx: &Context<'_>,
        purchases: Vec<TicketClaimInput>,
    ) -> Result<DisplayPurchaseOrder> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let claims: Vec<TicketClaim> = purchases.into_iter().map(|p| p.into_claim()).collect();
        let order = PurchaseOrder::claim(&user.user, &claims, &mut conn)?;
        Ok(DisplayPurchaseOrder(order))
    }

    /// Creates (or returns the existing) hosted checkout for an unpaid
    /// order.
    async fn create_purchase_order_payment(&self, ctx: &Context<'_>, order_id: Uuid) -> Result<DisplayPurchaseOrder> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let order = PurchaseOrder::find(order_id, &mut conn)?;
        if order.user_id != user.id() {
            return Err(DatabaseError::new(
                ErrorCode::AccessError,
                Some("Purchase order belongs to another user".to_string()),
            )
            .into());
        }
        if !order.requires_payment() {
            DatabaseError::business_process_error::<()>("Purchase order does not require payment")?;
        }
        if order.payment_link.is_some() {
            return Ok(DisplayPurchaseOrder(order));
        }

        let tickets = order.tickets(&mut conn)?;
        let description = match tickets.first() {
            Some(ticket) => ticket.template(&mut conn)?.event(&mut conn)?.name,
            None => "Tickets".to_string(),
        };

        let providers = ctx.data_unchecked::<Arc<PaymentProviders>>();
        let gateway = providers.for_currency(&order.currency)?;
        let checkout = gateway.create_checkout(&order, &description)?;
        let order =
            order.set_payment_reference(gateway.platform(), &checkout.reference_id, &checkout.payment_link, &mut conn)?;
        Ok(DisplayPurchaseOrder(order))
    }

    /// Polls the payment provider and applies any settlement. The frontend
    /// calls this when the customer returns from checkout, in case the
    /// provider's webhook has not landed yet.
    async fn check_purchase_order_status(&self, ctx: &Context<'_>, order_id: Uuid) -> Result<DisplayPurchaseOrder> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let order = PurchaseOrder::find(order_id, &mut conn)?;
        if order.user_id != user.id() {
            return Err(DatabaseError::new(
                ErrorCode::AccessError,
                Some("Purchase order belongs to another user".to_string()),
            )
            .into());
        }

        let platform = match (order.payment_status, order.payment_platform) {
            (PaymentStatus::Unpaid, Some(platform)) => platform,
            _ => return Ok(DisplayPurchaseOrder(order)),
        };

        let providers = ctx.data_unchecked::<Arc<PaymentProviders>>();
        let config = ctx.data_unchecked::<Config>();
        let order = match providers.gateway(platform).checkout_status(&order)? {
            Some(status) => orders::apply_payment_status(&order, status, config, &mut conn)?,
            None => order,
        };
        Ok(DisplayPurchaseOrder(order))
    }

    async fn cancel_purchase_order(&self, ctx: &Context<'_>, order_id: Uuid) -> Result<DisplayPurchaseOrder> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let order = PurchaseOrder::find(order_id, &mut conn)?;
        if order.user_id != user.id() {
            return Err(DatabaseError::new(
                ErrorCode::AccessError,
                Some("Purchase order belongs to another user".to_string()),
            )
            .into());
        }

        // Closing the provider checkout is best effort; the expiry sweep
        // retries any that slipped through.
        if let Some(platform) = order.payment_platform {
            let providers = ctx.data_unchecked::<Arc<PaymentProviders>>();
            if let Err(err) = providers.gateway(platform).cancel_checkout(&order) {
                jlog!(
                    Warn,
                    LOG_TARGET,
                    "Could not close provider checkout for cancelled order",
                    { "purchase_order_id": order.id, "error": err.to_string() }
                );
            }
        }
        Ok(DisplayPurchaseOrder(order.mark_cancelled(&mut conn)?))
    }

    async fn cancel_user_ticket(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        if ticket.user_id != user.id() {
            return Err(
                DatabaseError::new(ErrorCode::AccessError, Some("Ticket belongs to another user".to_string())).into(),
            );
        }
        Ok(DisplayUserTicket(ticket.cancel(&mut conn)?))
    }

    /// Marks a ticket redeemed at the door. Organizers only.
    async fn redeem_user_ticket(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        let event = ticket.template(&mut conn)?.event(&mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;
        Ok(DisplayUserTicket(ticket.redeem(&mut conn)?))
    }

    /// Approves a pending waitlist claim and notifies the attendee.
    async fn approve_user_ticket(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        let template = ticket.template(&mut conn)?;
        let event = template.event(&mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;

        let ticket = ticket.approve(&mut conn)?;
        if template.requires_approval {
            let config = ctx.data_unchecked::<Config>();
            let owner = ticket.owner(&mut conn)?;
            communications::waitlist_approved(&owner, &event.name, &config.communication_default_source_email)
                .queue(&mut conn)?;
        }
        Ok(DisplayUserTicket(ticket))
    }

    async fn reject_user_ticket(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        let template = ticket.template(&mut conn)?;
        let event = template.event(&mut conn)?;
        user.require_organizer(event.community_id, &mut conn)?;

        let ticket = ticket.reject(&mut conn)?;
        if template.requires_approval {
            let config = ctx.data_unchecked::<Config>();
            let owner = ticket.owner(&mut conn)?;
            communications::waitlist_rejected(&owner, &event.name, &config.communication_default_source_email)
                .queue(&mut conn)?;
        }
        Ok(DisplayUserTicket(ticket))
    }

    /// Offers a ticket to someone else by email. The ticket stays with the
    /// sender until the recipient accepts.
    async fn gift_user_ticket(&self, ctx: &Context<'_>, id: Uuid, recipient_email: String) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        if ticket.user_id != user.id() {
            return Err(
                DatabaseError::new(ErrorCode::AccessError, Some("Ticket belongs to another user".to_string())).into(),
            );
        }

        let event = ticket.template(&mut conn)?.event(&mut conn)?;
        let ticket = ticket.gift(&recipient_email, &mut conn)?;

        let config = ctx.data_unchecked::<Config>();
        communications::ticket_gifted(
            &user.user,
            &recipient_email,
            &event.name,
            &config.communication_default_source_email,
        )
        .queue(&mut conn)?;
        Ok(DisplayUserTicket(ticket))
    }

    /// Accepts a ticket gifted to the caller's email address and notifies
    /// the original owner.
    async fn accept_gifted_ticket(&self, ctx: &Context<'_>, id: Uuid) -> Result<DisplayUserTicket> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let ticket = UserTicket::find(id, &mut conn)?;
        let original_owner = ticket.owner(&mut conn)?;
        let event = ticket.template(&mut conn)?.event(&mut conn)?;

        let ticket = ticket.accept_gift(&user.user, &mut conn)?;

        let config = ctx.data_unchecked::<Config>();
        communications::gift_accepted(
            &original_owner,
            &user.user.full_name(),
            &event.name,
            &config.communication_default_source_email,
        )
        .queue(&mut conn)?;
        Ok(DisplayUserTicket(ticket))
    }

    /// Starts (or restarts) validation of a work email address and sends
    /// the confirmation link.
    async fn start_work_email_validation(&self, ctx: &Context<'_>, email: String) -> Result<DisplayWorkEmail> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let work_email = WorkEmail::start_validation(&user.user, &email, &mut conn)?;

        let config = ctx.data_unchecked::<Config>();
        communications::work_email_confirmation(
            &work_email,
            &config.front_end_url,
            &config.communication_default_source_email,
        )
        .queue(&mut conn)?;
        Ok(DisplayWorkEmail(work_email))
    }

    /// Confirms a work email from the emailed code and registers the email
    /// domain as a company.
    async fn validate_work_email(&self, ctx: &Context<'_>, code: Uuid) -> Result<DisplayWorkEmail> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let work_email = WorkEmail::find_by_confirmation_code(code, &mut conn)?;
        if work_email.user_id != user.id() {
            return Err(DatabaseError::new(
                ErrorCode::AccessError,
                Some("Work email belongs to another user".to_string()),
            )
            .into());
        }

        let work_email = work_email.confirm(&mut conn)?;
        if let Some(domain) = work_email.domain() {
            Company::find_or_create_by_domain(domain, &mut conn)?;
        }
        Ok(DisplayWorkEmail(work_email))
    }

    async fn create_company(&self, ctx: &Context<'_>, input: CompanyCreateInput) -> Result<DisplayCompany> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_admin()?;
        Ok(DisplayCompany(input.into_new_company().commit(&mut conn)?))
    }

    async fn update_company(&self, ctx: &Context<'_>, id: Uuid, input: CompanyUpdateInput) -> Result<DisplayCompany> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        user.require_admin()?;
        let company = Company::find(id, &mut conn)?;
        Ok(DisplayCompany(company.update(input.into_attributes(), &mut conn)?))
    }

    /// Adds a salary entry. Requires a confirmed work email; when no
    /// company is given the entry is filed under the email's domain.
    async fn create_salary(&self, ctx: &Context<'_>, input: SalaryCreateInput) -> Result<DisplaySalary> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;

        let company_id = match input.company_id {
            Some(company_id) => Company::find(company_id, &mut conn)?.id,
            None => {
                let confirmed = WorkEmail::find_for_user(user.id(), &mut conn)?
                    .into_iter()
                    .find(|w| w.status == WorkEmailStatus::Confirmed);
                let domain = match confirmed.as_ref().and_then(|w| w.domain()) {
                    Some(domain) => domain.to_string(),
                    None => {
                        return Err(DatabaseError::new(
                            ErrorCode::BusinessProcessError,
                            Some("A confirmed work email is required before adding a salary".to_string()),
                        )
                        .into());
                    }
                };
                Company::find_or_create_by_domain(&domain, &mut conn)?.id
            }
        };

        let new_salary = NewSalary {
            user_id: user.id(),
            company_id,
            amount_in_cents: input.amount_in_cents,
            currency: input.currency,
            work_role: input.work_role,
            years_of_experience: input.years_of_experience,
            gender: input.gender,
            country_code: input.country_code,
            work_setting: input.work_setting.into(),
        };
        Ok(DisplaySalary(new_salary.commit(&mut conn)?))
    }

    async fn update_salary(&self, ctx: &Context<'_>, id: Uuid, input: SalaryUpdateInput) -> Result<DisplaySalary> {
        let mut conn = connection(ctx)?;
        let user = auth_user(ctx, &mut conn)?;
        let salary = Salary::find(id, &mut conn)?;
        if salary.user_id != user.id() {
            return Err(
                DatabaseError::new(ErrorCode::AccessError, Some("Salary belongs to another user".to_string())).into(),
            );
        }
        Ok(DisplaySalary(salary.update(input.into_attributes(), &mut conn)?))
    }
}
