use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Subject of a verified access token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct BearerIdentity {
    pub user_id: UserId,
}

/// Middleware that validates access tokens and adds the caller's identity to
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    // Refresh and reset tokens are signed with the same key; only access
    // tokens open protected routes.
    let claims = state
        .authenticator
        .validate_token(token, TokenKind::Access)
        .map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::error!("Failed to parse user ID from token: {}", e);
        ApiError::Unauthorized("Invalid token format".to_string())
    })?;

    req.extensions_mut().insert(BearerIdentity { user_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_str.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(auth::BEARER) && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}
