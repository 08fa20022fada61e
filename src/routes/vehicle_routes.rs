use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::dto::vehicle_dto::VehicleForm;
use crate::dto::ApiResponse;
use crate::models::auth::AuthUser;
use crate::models::vehicle::{Vehicle, VehicleListResponse};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::validate_uuid;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle))
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    validate_uuid(raw).map_err(|_| bad_request_error(&format!("Invalid vehicle id '{}'", raw)))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<VehicleListResponse>>> {
    let vehicles = state.vehicles.list().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let vehicle = state.vehicles.get(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<VehicleForm>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vehicle>>)> {
    let vehicle = state.vehicles.create(form).await?;
    info!("🚗 Alta de {} por {}", vehicle.id, user.email);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            vehicle,
            "Vehicle added successfully",
        )),
    ))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(form): Json<VehicleForm>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let vehicle = state.vehicles.update(parse_id(&id)?, form).await?;
    info!("✏️ Edición de {} por {}", vehicle.id, user.email);
    Ok(Json(ApiResponse::success_with_message(
        vehicle,
        "Vehicle updated successfully",
    )))
}
