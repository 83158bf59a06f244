pub use self::domain_action_monitor::DomainActionMonitor;
pub use self::routing::{DomainActionExecutor, DomainActionRouter};

pub mod executors;

mod domain_action_monitor;
mod routing;
