use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Alert, AlertSeverity, AlertType};

pub const DEFAULT_ALERT_LIMIT: i64 = 50;

// Filtros del listado de alertas
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AlertListQuery {
    pub vehicle_id: Option<Uuid>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

impl AlertListQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_ALERT_LIMIT)
    }
}

// Response de alerta
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            vehicle_id: alert.vehicle_id,
            owner_id: alert.owner_id,
            alert_type: alert.alert_type,
            severity: alert.severity,
            title: alert.title,
            message: alert.message,
            metadata: alert.metadata.0,
            is_read: alert.is_read,
            created_at: alert.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_range() {
        let ok = AlertListQuery { vehicle_id: None, limit: Some(10) };
        assert!(ok.validate().is_ok());
        assert_eq!(AlertListQuery::default().limit(), DEFAULT_ALERT_LIMIT);

        let too_big = AlertListQuery { vehicle_id: None, limit: Some(10_000) };
        assert!(too_big.validate().is_err());
        let zero = AlertListQuery { vehicle_id: None, limit: Some(0) };
        assert!(zero.validate().is_err());
    }
}
