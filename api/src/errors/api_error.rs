use crate::errors::*;
use actix_web::http::StatusCode;
use actix_web::{error::ResponseError, HttpResponse};
use gather_db::utils::errors::*;
use jsonwebtoken::errors::Error as JwtError;
use mercado_pago::MercadoPagoError;
use resend::ResendError;
use sanity::SanityError;
use serde_json::Error as SerdeError;
use std::error::Error;
use std::fmt;
use stripe::StripeError;

#[derive(Debug)]
pub struct ApiError(Box<dyn ConvertToWebError + Send + Sync>);

macro_rules! error_conversion {
    ($e: ty) => {
        impl From<$e> for ApiError {
            fn from(e: $e) -> Self {
                ApiError(Box::new(e))
            }
        }
    };
}

error_conversion!(ApplicationError);
error_conversion!(AuthError);
error_conversion!(DatabaseError);
error_conversion!(EnumParseError);
error_conversion!(JwtError);
error_conversion!(MercadoPagoError);
error_conversion!(NotFoundError);
error_conversion!(ResendError);
error_conversion!(SanityError);
error_conversion!(SerdeError);
error_conversion!(StripeError);
error_conversion!(diesel::r2d2::PoolError);
error_conversion!(diesel::result::Error);
error_conversion!(uuid::Error);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0.to_string())
    }
}

impl Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }
    fn error_response(&self) -> HttpResponse {
        self.0.to_response()
    }
}

impl ApiError {
    pub fn new(inner: Box<dyn ConvertToWebError + Send + Sync>) -> ApiError {
        ApiError(inner)
    }

    pub fn unprocessable(message: &str) -> ApiError {
        ApplicationError::new(message.to_string()).into()
    }

    pub fn into_inner(&self) -> &dyn ConvertToWebError {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_status_codes() {
        let not_found: ApiError = DatabaseError::new(ErrorCode::NoResults, None).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let conflict: ApiError = DatabaseError::new(ErrorCode::DuplicateKeyError, None).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let unprocessable: ApiError = DatabaseError::new(ErrorCode::BusinessProcessError, None).into();
        assert_eq!(unprocessable.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let internal: ApiError = DatabaseError::new(ErrorCode::QueryError, None).into();
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_error_status_codes() {
        let unauthorized: ApiError = AuthError::unauthorized("No token").into();
        assert_eq!(unauthorized.status_code(), StatusCode::UNAUTHORIZED);

        let forbidden: ApiError = AuthError::forbidden("Not an organizer").into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
