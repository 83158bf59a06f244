//! GraphQL mirrors of the database enums. The `remote` attribute derives
//! the conversions in both directions.

use async_graphql::Enum;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::CommunityRole")]
pub enum CommunityRole {
    Admin,
    Collaborator,
    Member,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::CommunityStatus")]
pub enum CommunityStatus {
    Active,
    Inactive,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::EventStatus")]
pub enum EventStatus {
    Draft,
    Active,
    Inactive,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::Visibility")]
pub enum Visibility {
    Public,
    Private,
    Unlisted,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::TicketTemplateStatus")]
pub enum TicketTemplateStatus {
    Active,
    Inactive,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::TicketApprovalStatus")]
pub enum TicketApprovalStatus {
    Pending,
    Approved,
    Gifted,
    GiftAccepted,
    Rejected,
    Cancelled,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::TicketRedemptionStatus")]
pub enum TicketRedemptionStatus {
    Pending,
    Redeemed,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::PaymentStatus")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Expired,
    Cancelled,
    NotRequired,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::PaymentPlatform")]
pub enum PaymentPlatform {
    Stripe,
    MercadoPago,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::WorkEmailStatus")]
pub enum WorkEmailStatus {
    Pending,
    Confirmed,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "gather_db::models::enums::WorkSetting")]
pub enum WorkSetting {
    Remote,
    Hybrid,
    Office,
}
