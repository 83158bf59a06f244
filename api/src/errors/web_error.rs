use crate::errors::*;
use actix_web::{http::StatusCode, HttpResponse};
use gather_db::utils::errors::*;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use log::{error, info, warn};
use mercado_pago::MercadoPagoError;
use resend::ResendError;
use sanity::SanityError;
use serde_json::json;
use serde_json::Error as SerdeError;
use std::error::Error;
use std::fmt::Debug;
use stripe::StripeError;

pub trait ConvertToWebError: Debug + Error + ToString {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
    fn to_response(&self) -> HttpResponse;
}

fn internal_error(message: &str) -> HttpResponse {
    status_code_and_message(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn unauthorized(message: &str) -> HttpResponse {
    status_code_and_message(StatusCode::UNAUTHORIZED, message)
}

fn forbidden(message: &str) -> HttpResponse {
    status_code_and_message(StatusCode::FORBIDDEN, message)
}

fn not_found() -> HttpResponse {
    status_code_and_message(StatusCode::NOT_FOUND, "Not found")
}

fn status_code_and_message(code: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(code).json(json!({ "error": message.to_string() }))
}

impl ConvertToWebError for ApplicationError {
    fn to_response(&self) -> HttpResponse {
        error!("Application error: {}", self.reason);
        internal_error(&self.reason)
    }
}

impl ConvertToWebError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            AuthErrorType::Forbidden => StatusCode::FORBIDDEN,
            AuthErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
    fn to_response(&self) -> HttpResponse {
        info!("Auth error: {}", self.reason);
        match self.error_type {
            AuthErrorType::Forbidden => forbidden(&self.reason),
            AuthErrorType::Unauthorized => unauthorized(&self.reason),
        }
    }
}

impl ConvertToWebError for NotFoundError {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }
    fn to_response(&self) -> HttpResponse {
        not_found()
    }
}

impl ConvertToWebError for JwtError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
    fn to_response(&self) -> HttpResponse {
        match self.kind() {
            JwtErrorKind::ExpiredSignature => info!("JWT error: {}", self),
            _ => warn!("JWT error: {}", self),
        }
        unauthorized("Invalid token")
    }
}

impl ConvertToWebError for DatabaseError {
    fn status_code(&self) -> StatusCode {
        match self.error_code {
            ErrorCode::NoResults => StatusCode::NOT_FOUND,
            ErrorCode::AccessError => StatusCode::FORBIDDEN,
            ErrorCode::BusinessProcessError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DuplicateKeyError => StatusCode::CONFLICT,
            ErrorCode::ConcurrencyError => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn to_response(&self) -> HttpResponse {
        match self.error_code {
            ErrorCode::NoResults => not_found(),
            ErrorCode::AccessError => forbidden(&self.to_string()),
            ErrorCode::BusinessProcessError
            | ErrorCode::ValidationError { .. }
            | ErrorCode::DuplicateKeyError
            | ErrorCode::ConcurrencyError => {
                status_code_and_message(self.status_code(), &self.to_string())
            }
            _ => {
                error!("Database error: {}", self);
                internal_error("Internal error")
            }
        }
    }
}

impl ConvertToWebError for EnumParseError {
    fn to_response(&self) -> HttpResponse {
        error!("Enum parse error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for diesel::result::Error {
    fn to_response(&self) -> HttpResponse {
        error!("Diesel error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for diesel::r2d2::PoolError {
    fn to_response(&self) -> HttpResponse {
        error!("R2D2 error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for SerdeError {
    fn to_response(&self) -> HttpResponse {
        error!("Serde error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for uuid::Error {
    fn to_response(&self) -> HttpResponse {
        error!("UUID parse error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for StripeError {
    fn to_response(&self) -> HttpResponse {
        error!("Stripe error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for MercadoPagoError {
    fn to_response(&self) -> HttpResponse {
        error!("MercadoPago error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for ResendError {
    fn to_response(&self) -> HttpResponse {
        error!("Resend error: {}", self);
        internal_error("Internal error")
    }
}

impl ConvertToWebError for SanityError {
    fn to_response(&self) -> HttpResponse {
        error!("Sanity error: {}", self);
        internal_error("Internal error")
    }
}
