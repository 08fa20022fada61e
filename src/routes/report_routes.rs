use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::dto::booking_dto::ReportQuery;
use crate::dto::ApiResponse;
use crate::models::dashboard::BookingReport;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_report_router() -> Router<AppState> {
    Router::new().route("/", get(get_report))
}

async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ApiResponse<BookingReport>>> {
    let report = state.reports.report(query.period).await?;
    Ok(Json(ApiResponse::success(report)))
}
