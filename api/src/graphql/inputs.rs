use crate::graphql::enums;
use async_graphql::InputObject;
use chrono::NaiveDateTime;
use gather_db::prelude::*;
use uuid::Uuid;

#[derive(InputObject)]
pub struct UserUpdateInput {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

impl UserUpdateInput {
    pub fn into_attributes(self) -> UserEditableAttributes {
        UserEditableAttributes {
            name: self.name,
            username: self.username,
            bio: self.bio,
            image_url: self.image_url,
        }
    }
}

#[derive(InputObject)]
pub struct CommunityCreateInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
}

impl CommunityCreateInput {
    pub fn into_new_community(self) -> NewCommunity {
        NewCommunity {
            name: self.name,
            slug: self.slug,
            description: self.description,
            status: CommunityStatus::Active,
            logo_url: self.logo_url,
            banner_url: self.banner_url,
        }
    }
}

#[derive(InputObject)]
pub struct CommunityUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<enums::CommunityStatus>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
}

impl CommunityUpdateInput {
    pub fn into_attributes(self) -> CommunityEditableAttributes {
        CommunityEditableAttributes {
            name: self.name,
            description: self.description,
            status: self.status.map(Into::into),
            logo_url: self.logo_url,
            banner_url: self.banner_url,
        }
    }
}

#[derive(InputObject)]
pub struct EventCreateInput {
    pub community_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub visibility: Option<enums::Visibility>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub timezone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub max_attendees: Option<i64>,
}

impl EventCreateInput {
    pub fn into_new_event(self) -> NewEvent {
        NewEvent {
            community_id: self.community_id,
            name: self.name,
            description: self.description,
            status: EventStatus::Draft,
            visibility: self.visibility.map(Into::into).unwrap_or(Visibility::Public),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            timezone: self.timezone,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            max_attendees: self.max_attendees,
        }
    }
}

#[derive(InputObject)]
pub struct EventUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<enums::EventStatus>,
    pub visibility: Option<enums::Visibility>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub timezone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub max_attendees: Option<i64>,
    pub preview_image_url: Option<String>,
}

impl EventUpdateInput {
    pub fn into_attributes(self) -> EventEditableAttributes {
        EventEditableAttributes {
            name: self.name,
            description: self.description,
            status: self.status.map(Into::into),
            visibility: self.visibility.map(Into::into),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            timezone: self.timezone,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            max_attendees: self.max_attendees,
            preview_image_url: self.preview_image_url,
        }
    }
}

#[derive(InputObject)]
pub struct EventSearchInput {
    pub community_id: Option<Uuid>,
    pub status: Option<enums::EventStatus>,
    pub tag_id: Option<Uuid>,
    pub query: Option<String>,
    pub starts_after: Option<NaiveDateTime>,
    pub ends_before: Option<NaiveDateTime>,
}

impl EventSearchInput {
    pub fn into_parameters(self) -> EventSearchParameters {
        EventSearchParameters {
            community_id: self.community_id,
            status: self.status.map(Into::into),
            tag_id: self.tag_id,
            query: self.query,
            starts_after: self.starts_after,
            ends_before: self.ends_before,
        }
    }
}

#[derive(InputObject)]
pub struct SessionCreateInput {
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub speaker_names: Vec<String>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub room: Option<String>,
}

impl SessionCreateInput {
    pub fn into_new_session(self) -> NewSession {
        NewSession {
            event_id: self.event_id,
            title: self.title,
            description: self.description,
            speaker_names: self.speaker_names,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            room: self.room,
        }
    }
}

#[derive(InputObject)]
pub struct TicketTemplateCreateInput {
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub visibility: Option<enums::Visibility>,
    pub quantity: Option<i64>,
    pub max_per_user: Option<i64>,
    pub price_in_cents: i64,
    pub currency: String,
    #[graphql(default = false)]
    pub requires_approval: bool,
}

impl TicketTemplateCreateInput {
    pub fn into_new_ticket_template(self) -> NewTicketTemplate {
        NewTicketTemplate {
            event_id: self.event_id,
            name: self.name,
            description: self.description,
            status: TicketTemplateStatus::Active,
            visibility: self.visibility.map(Into::into).unwrap_or(Visibility::Public),
            quantity: self.quantity,
            max_per_user: self.max_per_user,
            price_in_cents: self.price_in_cents,
            currency: self.currency,
            requires_approval: self.requires_approval,
        }
    }
}

#[derive(InputObject)]
pub struct TicketTemplateUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<enums::TicketTemplateStatus>,
    pub visibility: Option<enums::Visibility>,
    pub quantity: Option<i64>,
    pub max_per_user: Option<i64>,
    pub price_in_cents: Option<i64>,
}

impl TicketTemplateUpdateInput {
    pub fn into_attributes(self) -> TicketTemplateEditableAttributes {
        TicketTemplateEditableAttributes {
            name: self.name,
            description: self.description,
            status: self.status.map(Into::into),
            visibility: self.visibility.map(Into::into),
            quantity: self.quantity.map(Some),
            max_per_user: self.max_per_user.map(Some),
            price_in_cents: self.price_in_cents,
        }
    }
}

#[derive(InputObject)]
pub struct TicketClaimInput {
    pub ticket_template_id: Uuid,
    pub quantity: i64,
}

impl TicketClaimInput {
    pub fn into_claim(self) -> TicketClaim {
        TicketClaim {
            ticket_template_id: self.ticket_template_id,
            quantity: self.quantity,
        }
    }
}

#[derive(InputObject)]
pub struct UserTicketFilterInput {
    pub event_id: Option<Uuid>,
    pub approval_status: Option<enums::TicketApprovalStatus>,
}

impl UserTicketFilterInput {
    pub fn into_filters(self) -> UserTicketFilters {
        UserTicketFilters {
            event_id: self.event_id,
            approval_status: self.approval_status.map(Into::into),
        }
    }
}

#[derive(InputObject)]
pub struct CompanyCreateInput {
    pub name: Option<String>,
    pub domain: String,
    pub logo_url: Option<String>,
}

impl CompanyCreateInput {
    pub fn into_new_company(self) -> NewCompany {
        NewCompany {
            name: self.name,
            domain: self.domain,
            logo_url: self.logo_url,
            status: CompanyStatus::Active,
        }
    }
}

#[derive(InputObject)]
pub struct CompanyUpdateInput {
    pub name: Option<String>,
    pub logo_url: Option<String>,
}

impl CompanyUpdateInput {
    pub fn into_attributes(self) -> CompanyEditableAttributes {
        CompanyEditableAttributes {
            name: self.name,
            logo_url: self.logo_url,
            status: None,
        }
    }
}

#[derive(InputObject)]
pub struct SalaryCreateInput {
    /// When omitted, the company is derived from the caller's confirmed
    /// work email domain.
    pub company_id: Option<Uuid>,
    pub amount_in_cents: i64,
    pub currency: String,
    pub work_role: String,
    pub years_of_experience: i32,
    pub gender: Option<String>,
    pub country_code: String,
    pub work_setting: enums::WorkSetting,
}

#[derive(InputObject)]
pub struct SalaryUpdateInput {
    pub amount_in_cents: Option<i64>,
    pub currency: Option<String>,
    pub work_role: Option<String>,
    pub years_of_experience: Option<i32>,
    pub gender: Option<String>,
    pub work_setting: Option<enums::WorkSetting>,
}

impl SalaryUpdateInput {
    pub fn into_attributes(self) -> SalaryEditableAttributes {
        SalaryEditableAttributes {
            amount_in_cents: self.amount_in_cents,
            currency: self.currency,
            work_role: self.work_role,
            years_of_experience: self.years_of_experience,
            gender: self.gender.map(Some),
            work_setting: self.work_setting.map(Into::into),
        }
    }
}
