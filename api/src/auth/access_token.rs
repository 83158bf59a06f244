use crate::errors::ApiError;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims of the bearer token issued by the identity provider. Tokens are
/// verified but never minted here.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AccessToken {
    pub sub: String,
    pub exp: u64,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl AccessToken {
    pub fn decode(token: &str, secret: &str) -> Result<AccessToken, ApiError> {
        let data = jsonwebtoken::decode::<AccessToken>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(claims: &AccessToken, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims(exp: u64) -> AccessToken {
        AccessToken {
            sub: "auth0|abc123".to_string(),
            exp,
            email: Some("ana@example.com".to_string()),
            name: Some("Ana".to_string()),
        }
    }

    #[test]
    fn decodes_valid_token() {
        let exp = (chrono::Utc::now().timestamp() + 3600) as u64;
        let token = token_for(&claims(exp), "secret");
        let decoded = AccessToken::decode(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "auth0|abc123");
        assert_eq!(decoded.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let exp = (chrono::Utc::now().timestamp() + 3600) as u64;
        let token = token_for(&claims(exp), "secret");
        assert!(AccessToken::decode(&token, "other-secret").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let exp = (chrono::Utc::now().timestamp() - 3600) as u64;
        let token = token_for(&claims(exp), "secret");
        assert!(AccessToken::decode(&token, "secret").is_err());
    }
}
