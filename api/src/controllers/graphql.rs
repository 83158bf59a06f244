use crate::auth::AccessToken;
use crate::config::Config;
use crate::graphql::GatherSchema;
use actix_web::{web, HttpRequest, HttpResponse};
use async_graphql::http::graphiql_source;
use async_graphql::ServerError;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

/// The single GraphQL endpoint. Requests may carry a bearer token; a
/// missing token runs the request anonymously and resolvers that need a
/// caller reject it themselves.
pub async fn execute(
    schema: web::Data<GatherSchema>,
    config: web::Data<Config>,
    http_request: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();

    if let Some(token) = bearer_token(&http_request) {
        match AccessToken::decode(&token, &config.token_secret) {
            Ok(claims) => request = request.data(claims),
            Err(_) => {
                // A present but invalid token is rejected outright rather
                // than downgraded to an anonymous request.
                return async_graphql::Response::from_errors(vec![ServerError::new("Invalid access token", None)])
                    .into();
            }
        }
    }

    schema.execute(request).await.into()
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(graphiql_source("/graphql", None))
}

fn bearer_token(request: &HttpRequest) -> Option<String> {
    let header = request.headers().get("Authorization")?.to_str().ok()?;
    let mut parts = header.splitn(2, ' ');
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_token_parsing() {
        let request = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&request), Some("abc.def.ghi".to_string()));

        let request = TestRequest::default()
            .insert_header(("Authorization", "bearer abc"))
            .to_http_request();
        assert_eq!(bearer_token(&request), Some("abc".to_string()));

        let request = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(bearer_token(&request), None);

        let request = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&request), None);
    }
}
