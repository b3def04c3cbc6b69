use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::VehicleController;
use crate::dto::vehicle_dto::{VehicleEfficiencyResponse, VehicleMaintenanceResponse};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/:id/efficiency", get(get_efficiency))
        .route("/:id/maintenance", get(get_maintenance))
}

async fn get_efficiency(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleEfficiencyResponse>>, AppError> {
    let controller = VehicleController::new(state.records.clone());
    let response = controller.efficiency(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleMaintenanceResponse>>, AppError> {
    let controller = VehicleController::new(state.records.clone());
    let response = controller.maintenance(id).await?;
    Ok(Json(ApiResponse::success(response)))
}
