pub mod graphql;
pub mod status;
pub mod webhooks;
