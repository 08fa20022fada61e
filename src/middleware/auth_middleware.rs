//! Middleware de autenticación
//!
//! Exige un `Authorization: Bearer <token>` con sesión válida y deja el
//! usuario en las extensiones del request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Extrae el token del header Authorization
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?
        .to_string();

    let user = state
        .auth
        .current_user(&token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    debug!("🔓 {} {} como {}", request.method(), request.uri().path(), user.id);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
