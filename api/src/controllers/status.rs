use actix_web::HttpResponse;
use serde_json::json;

pub async fn check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
