use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};

use crate::dto::auth_dto::{GateResponse, LoginRequest, SessionResponse, SignUpRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth_middleware::bearer_token;
use crate::models::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthUser>>)> {
    let user = state.auth.sign_up(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            user,
            "Account created successfully!",
        )),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    let session = state.auth.sign_in(request).await?;
    Ok(Json(ApiResponse::success(SessionResponse::from(session))))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<()>>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
    state.auth.sign_out(token).await?;
    Ok(Json(ApiResponse::success_with_message((), "Signed out")))
}

async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<ApiResponse<GateResponse>> {
    let (gate, user) = state.auth.gate(bearer_token(&headers)).await;
    Json(ApiResponse::success(GateResponse { gate, user }))
}
