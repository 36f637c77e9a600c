//! Caller authentication for per-user gateway routes.
//!
//! The caller presents `Authorization: Bearer <jwt>`, a session token issued
//! by the account service. The resolved [`User`] is inserted into request
//! extensions; handlers read it with `Extension<User>` and never take a user
//! id from the path or body.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::{error::AppError, models::User, routes::AppState};

/// Token from an `Authorization: Bearer` header, if present and non-blank
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Applied to protected routes only
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Auth("Authentication required".to_string()))?
        .to_string();

    let user: User = state
        .remote
        .user_for_token(&token)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid or expired session".to_string()))?;

    tracing::debug!(user_id = %user.id, "Caller authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
