pub use self::communities::*;
pub use self::events::*;
pub use self::orders::*;
pub use self::surveys::*;
pub use self::tickets::*;
pub use self::users::*;

mod communities;
mod events;
mod orders;
mod surveys;
mod tickets;
mod users;
