pub use self::mutations::Mutation;
pub use self::queries::Query;

pub mod enums;
pub mod inputs;
pub mod objects;

mod mutations;
mod queries;

use crate::auth::{AccessToken, AuthUser};
use crate::config::Config;
use crate::db::{Connection, Database};
use crate::errors::AuthError;
use crate::payments::PaymentProviders;
use async_graphql::{Context, EmptySubscription, Result, Schema};
use std::sync::Arc;

pub type GatherSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(database: Database, config: Config, providers: Arc<PaymentProviders>) -> GatherSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(database)
        .data(config)
        .data(providers)
        .finish()
}

pub fn connection(ctx: &Context<'_>) -> Result<Connection> {
    Ok(ctx.data_unchecked::<Database>().get_connection()?)
}

/// The authenticated caller, provisioned on first sight. Errors when the
/// request carried no valid token.
pub fn auth_user(ctx: &Context<'_>, conn: &mut diesel::PgConnection) -> Result<AuthUser> {
    let token = ctx
        .data_opt::<AccessToken>()
        .ok_or_else(|| AuthError::unauthorized("No access token provided"))?;
    Ok(AuthUser::load(token, conn)?)
}
