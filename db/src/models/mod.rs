pub use self::communication::*;
pub use self::communities::*;
pub use self::community_members::*;
pub use self::companies::*;
pub use self::domain_actions::*;
pub use self::enums::*;
pub use self::events::*;
pub use self::purchase_orders::*;
pub use self::salaries::*;
pub use self::sessions::*;
pub use self::tags::*;
pub use self::ticket_templates::*;
pub use self::user_tickets::*;
pub use self::users::*;
pub use self::work_emails::*;

pub mod communication;
pub mod communities;
pub mod community_members;
pub mod companies;
pub mod domain_actions;
pub mod enums;
pub mod events;
pub mod purchase_orders;
pub mod salaries;
pub mod sessions;
pub mod tags;
pub mod ticket_templates;
pub mod user_tickets;
pub mod users;
pub mod work_emails;
