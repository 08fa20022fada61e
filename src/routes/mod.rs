//! Rutas de la API
//!
//! `/health` y `/api/auth/*` son públicas; el resto exige sesión.

pub mod auth_routes;
pub mod booking_routes;
pub mod calendar_routes;
pub mod dashboard_routes;
pub mod report_routes;
pub mod vehicle_routes;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, middleware::from_fn_with_state,
    routing::get, BoxError, Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_layer};
use crate::state::AppState;

/// Tiempo máximo por request, incluidas las llamadas al backend
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/bookings", booking_routes::create_booking_router())
        .nest("/calendar", calendar_routes::create_calendar_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/reports", report_routes::create_report_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new()
        .nest("/auth", auth_routes::create_auth_router())
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(REQUEST_TIMEOUT),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn handle_timeout(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request Timeout", "code": "TIMEOUT" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal Server Error", "message": err.to_string() })),
        )
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet_rental",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
