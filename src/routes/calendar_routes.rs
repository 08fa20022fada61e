use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::dto::ApiResponse;
use crate::services::calendar_service::{CalendarSnapshot, DayDetail};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::validate_date;

pub fn create_calendar_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_calendar))
        .route("/refresh", post(refresh_calendar))
        .route("/:date", get(get_day))
}

/// Índice completo. Si aún no se ha cargado nunca, se carga ahora y un
/// fallo de esa primera carga se devuelve como error.
async fn get_calendar(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CalendarSnapshot>>> {
    ensure_loaded(&state).await?;
    Ok(Json(ApiResponse::success(state.calendar.snapshot().await)))
}

async fn refresh_calendar(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CalendarSnapshot>>> {
    state.calendar.reload().await?;
    Ok(Json(ApiResponse::success(state.calendar.snapshot().await)))
}

async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<ApiResponse<DayDetail>>> {
    let date = validate_date(&date)
        .map_err(|_| bad_request_error(&format!("Invalid date '{}', expected YYYY-MM-DD", date)))?;
    ensure_loaded(&state).await?;
    Ok(Json(ApiResponse::success(state.calendar.day(date).await)))
}

/// Sin ningún índice cargado no hay nada que servir
async fn ensure_loaded(state: &AppState) -> AppResult<()> {
    if state.calendar.snapshot().await.refreshed_at.is_none() {
        state.calendar.reload().await?;
    }
    Ok(())
}
