use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AlertStore;
use crate::models::{Alert, AlertType};
use crate::utils::errors::AppResult;

/// Acceso PostgreSQL a la tabla alerts
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn find_alert(
        &self,
        vehicle_id: Option<Uuid>,
        alert_type: AlertType,
        created_after: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Alert>> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE vehicle_id IS NOT DISTINCT FROM $1
              AND alert_type = $2
              AND is_active = TRUE
              AND ($3::timestamptz IS NULL OR created_at >= $3)
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(alert_type)
        .bind(created_after)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }

    async fn create_alert(&self, alert: &Alert) -> AppResult<Alert> {
        let created = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (id, vehicle_id, owner_id, alert_type, severity, title, message,
                                metadata, is_active, is_read, is_dismissed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(alert.id)
        .bind(alert.vehicle_id)
        .bind(alert.owner_id)
        .bind(alert.alert_type)
        .bind(alert.severity)
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(&alert.metadata)
        .bind(alert.is_active)
        .bind(alert.is_read)
        .bind(alert.is_dismissed)
        .bind(alert.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn active_alerts(&self, vehicle_id: Option<Uuid>, limit: i64) -> AppResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE is_active = TRUE
              AND ($1::uuid IS NULL OR vehicle_id = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(vehicle_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }
}
