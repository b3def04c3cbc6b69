use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::AlertController;
use crate::dto::alert_dto::{AlertListQuery, AlertResponse};
use crate::dto::ApiResponse;
use crate::services::RunSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/run-checks", post(run_checks))
}

fn controller(state: &AppState) -> AlertController {
    AlertController::new(state.alerts.clone(), state.runner.clone())
}

async fn run_checks(State(state): State<AppState>) -> Result<Json<ApiResponse<RunSummary>>, AppError> {
    let response = controller(&state).run_checks().await?;
    Ok(Json(response))
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> Result<Json<ApiResponse<Vec<AlertResponse>>>, AppError> {
    let alerts = controller(&state).list_active(query).await?;
    Ok(Json(ApiResponse::success(alerts)))
}
