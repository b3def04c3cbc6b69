use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::VehicleController;
use crate::dto::vehicle_dto::OwnerSummaryQuery;
use crate::dto::ApiResponse;
use crate::services::fleet_summary::FleetSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_owner_router() -> Router<AppState> {
    Router::new().route("/:owner_id/summary", get(get_summary))
}

async fn get_summary(
    State(state): State<AppState>,
    Path(owner_id): Path<Uuid>,
    Query(query): Query<OwnerSummaryQuery>,
) -> Result<Json<ApiResponse<FleetSummary>>, AppError> {
    let controller = VehicleController::new(state.records.clone());
    let summary = controller.owner_summary(owner_id, query).await?;
    Ok(Json(ApiResponse::success(summary)))
}
