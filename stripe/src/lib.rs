#[macro_use]
extern crate logging;

mod checkout_session;
mod stripe_client;
mod stripe_error;

pub use checkout_session::*;
pub use stripe_client::StripeClient;
pub use stripe_error::StripeError;
