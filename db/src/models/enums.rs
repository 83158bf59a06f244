use crate::utils::errors::EnumParseError;
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

macro_rules! string_enum {
    ($name:ident [$($value:ident),+]) => {
        #[derive(AsExpression, FromSqlRow, Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
        #[diesel(sql_type = Text)]
        pub enum $name {
            $(
                $value,
            )*
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
                let s = match self {
                    $(
                        $name::$value => stringify!($value),
                    )*
                };
                write!(f, "{}", s)
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<$name, Self::Err> {
                match s {
                    $(
                        stringify!($value) => Ok($name::$value),
                    )*
                    _ => Err(EnumParseError {
                        message: "Could not parse value".to_string(),
                        enum_type: stringify!($name).to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl ToSql<Text, Pg> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
                out.write_all(self.to_string().as_bytes())?;
                Ok(IsNull::No)
            }
        }

        impl FromSql<Text, Pg> for $name {
            fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
                let s = std::str::from_utf8(value.as_bytes())?;
                s.parse::<$name>().map_err(|e| e.to_string().into())
            }
        }
    };
}

string_enum! { CommunityStatus [Active, Inactive] }
string_enum! { CommunityRole [Admin, Collaborator, Member] }
string_enum! { CompanyStatus [Active, Draft] }
string_enum! { DomainActionStatus [Pending, RetriesExceeded, Errored, Success, Cancelled] }
string_enum! { DomainActionTypes [Communication, ExpirePurchaseOrders, ImportEventImage, PaymentProviderIpn] }
string_enum! { EventStatus [Draft, Active, Inactive] }
string_enum! { PaymentPlatform [Stripe, MercadoPago] }
string_enum! { PaymentStatus [Unpaid, Paid, Expired, Cancelled, NotRequired] }
string_enum! { TicketApprovalStatus [Pending, Approved, Gifted, GiftAccepted, Rejected, Cancelled] }
string_enum! { TicketRedemptionStatus [Pending, Redeemed] }
string_enum! { TicketTemplateStatus [Active, Inactive] }
string_enum! { Visibility [Public, Private, Unlisted] }
string_enum! { WorkEmailStatus [Pending, Confirmed] }
string_enum! { WorkSetting [Remote, Hybrid, Office] }

impl PaymentStatus {
    /// Terminal states never transition again, not even via provider
    /// reconciliation.
    pub fn is_terminal(self) -> bool {
        match self {
            PaymentStatus::Unpaid => false,
            PaymentStatus::Paid
            | PaymentStatus::Expired
            | PaymentStatus::Cancelled
            | PaymentStatus::NotRequired => true,
        }
    }
}

impl TicketApprovalStatus {
    pub fn is_redeemable(self) -> bool {
        matches!(self, TicketApprovalStatus::Approved | TicketApprovalStatus::GiftAccepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_parse() {
        assert_eq!(
            "GiftAccepted".parse::<TicketApprovalStatus>().unwrap(),
            TicketApprovalStatus::GiftAccepted
        );
        assert_eq!(TicketApprovalStatus::GiftAccepted.to_string(), "GiftAccepted");
        assert_eq!("MercadoPago".parse::<PaymentPlatform>().unwrap(), PaymentPlatform::MercadoPago);
        assert_eq!(PaymentStatus::NotRequired.to_string(), "NotRequired");
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = "Bogus".parse::<PaymentStatus>().unwrap_err();
        assert_eq!(err.enum_type, "PaymentStatus");
        assert_eq!(err.value, "Bogus");
    }

    #[test]
    fn terminal_payment_statuses() {
        assert!(!PaymentStatus::Unpaid.is_terminal());
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(PaymentStatus::NotRequired.is_terminal());
    }

    #[test]
    fn redeemable_approval_statuses() {
        assert!(TicketApprovalStatus::Approved.is_redeemable());
        assert!(TicketApprovalStatus::GiftAccepted.is_redeemable());
        assert!(!TicketApprovalStatus::Pending.is_redeemable());
        assert!(!TicketApprovalStatus::Gifted.is_redeemable());
        assert!(!TicketApprovalStatus::Rejected.is_redeemable());
        assert!(!TicketApprovalStatus::Cancelled.is_redeemable());
    }
}
