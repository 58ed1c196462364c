//! Authentication Middleware
//! Mission: Admit requests carrying a valid session token, reject the rest

use crate::auth::jwt::JwtHandler;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Auth middleware that validates JWT tokens.
///
/// Accepts either `Authorization: <token>` or `Authorization: Bearer <token>`,
/// with the scheme matched case-insensitively.
/// On success the decoded [`Claims`](crate::auth::models::Claims) are inserted
/// into the request extensions for downstream handlers.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers())?;

    let claims = jwt_handler.validate_token(token).map_err(|e| {
        debug!("Rejected token: {:#}", e);
        AppError::InvalidToken
    })?;

    // Tokens we issue always carry a UUID subject
    if claims.user_id().is_none() {
        return Err(AppError::InvalidToken);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn extract_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers.get(AUTHORIZATION).ok_or(AppError::MissingToken)?;
    let header = header.to_str().map_err(|_| AppError::InvalidToken)?;

    let token = match header.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ => header,
    }
    .trim();
    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Claims, User};
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-12345";

    fn create_test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "TestUser".to_string(),
            email: "testuser@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn guarded_router() -> Router {
        let jwt = Arc::new(JwtHandler::new(SECRET));
        Router::new()
            .route(
                "/whoami",
                get(|Extension(claims): Extension<Claims>| async move { claims.sub }),
            )
            .route_layer(middleware::from_fn_with_state(jwt, auth_middleware))
    }

    async fn call(auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = guarded_router()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Missing authorization token"));

        let (status, _) = call(Some("   ")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let (status, body) = call(Some("invalid.token.here")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_token_from_other_secret_rejected() {
        let other = JwtHandler::new("some-other-secret");
        let (token, _) = other.generate_token(&create_test_user()).unwrap();

        let (status, _) = call(Some(token.as_str())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_raw_and_bearer_tokens_admitted() {
        let user = create_test_user();
        let (token, _) = JwtHandler::new(SECRET).generate_token(&user).unwrap();

        let (status, body) = call(Some(token.as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user.id.to_string());

        let (status, body) = call(Some(format!("Bearer {}", token).as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user.id.to_string());
    }

    #[tokio::test]
    async fn test_bearer_scheme_is_case_insensitive() {
        let user = create_test_user();
        let (token, _) = JwtHandler::new(SECRET).generate_token(&user).unwrap();

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let (status, body) = call(Some(format!("{} {}", scheme, token).as_str())).await;
            assert_eq!(status, StatusCode::OK, "{}", scheme);
            assert_eq!(body, user.id.to_string());
        }

        let (status, _) = call(Some("bearer   ")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
