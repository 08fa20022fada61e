use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::ApiResponse;
use crate::services::dashboard_service::DashboardSnapshot;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_dashboard))
        .route("/refresh", post(refresh_dashboard))
}

/// Resumen actual; la primera lectura lo calcula y propaga su fallo
async fn get_dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardSnapshot>>> {
    if state.dashboard.snapshot().await.refreshed_at.is_none() {
        state.dashboard.reload().await?;
    }
    Ok(Json(ApiResponse::success(state.dashboard.snapshot().await)))
}

async fn refresh_dashboard(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardSnapshot>>> {
    state.dashboard.reload().await?;
    Ok(Json(ApiResponse::success(state.dashboard.snapshot().await)))
}
