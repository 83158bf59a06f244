use crate::db::Database;
use crate::domain_events::executors::process_payment_ipn::PaymentIpnPayload;
use crate::errors::ApiError;
use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use gather_db::prelude::*;
use log::Level::Debug;
use mercado_pago::IpnNotification;

/// MercadoPago notification endpoint. The body is unauthenticated so only
/// the payment id is taken from it; the worker re-fetches the payment from
/// the API before touching any order.
pub async fn mercado_pago(
    database: web::Data<Database>,
    data: web::Json<IpnNotification>,
) -> Result<HttpResponse, ApiError> {
    let notification = data.into_inner();
    jlog!(Debug, "gather::webhooks", "MercadoPago IPN received", { "notification": &notification });

    let payment_id = match (notification.is_payment(), notification.data) {
        (true, Some(data)) => data.id,
        _ => return Ok(HttpResponse::Ok().finish()),
    };

    let mut conn = database.get_connection()?;
    let payload = PaymentIpnPayload { payment_id };
    DomainAction::create(
        DomainActionTypes::PaymentProviderIpn,
        serde_json::to_value(&payload)?,
        None,
        None,
        Utc::now().naive_utc(),
        Utc::now().naive_utc() + Duration::days(30),
        5,
    )
    .commit(&mut conn)?;

    Ok(HttpResponse::Ok().finish())
}
