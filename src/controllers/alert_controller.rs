use std::sync::Arc;
use validator::Validate;

use crate::dto::alert_dto::{AlertListQuery, AlertResponse};
use crate::dto::ApiResponse;
use crate::repositories::AlertStore;
use crate::services::{BatchRunner, RunSummary};
use crate::utils::errors::AppResult;

pub struct AlertController {
    alerts: Arc<dyn AlertStore>,
    runner: BatchRunner,
}

impl AlertController {
    pub fn new(alerts: Arc<dyn AlertStore>, runner: BatchRunner) -> Self {
        Self { alerts, runner }
    }

    /// Ejecuta una pasada completa a pedido
    pub async fn run_checks(&self) -> AppResult<ApiResponse<RunSummary>> {
        tracing::info!("▶️ Ejecución manual de chequeos");
        let summary = self.runner.run_checks().await?;
        let message = format!("{} alertas creadas", summary.alerts_created);
        Ok(ApiResponse::success_with_message(summary, message))
    }

    pub async fn list_active(&self, query: AlertListQuery) -> AppResult<Vec<AlertResponse>> {
        query.validate()?;
        let alerts = self.alerts.active_alerts(query.vehicle_id, query.limit()).await?;
        Ok(alerts.into_iter().map(AlertResponse::from).collect())
    }
}
