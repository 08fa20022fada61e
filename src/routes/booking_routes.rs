use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::dto::booking_dto::BookingQuery;
use crate::dto::ApiResponse;
use crate::models::booking::Booking;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_booking_router() -> Router<AppState> {
    Router::new().route("/", get(list_bookings))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    let bookings = state.bookings.list(query.into_filter()?).await?;
    Ok(Json(ApiResponse::success(bookings)))
}
