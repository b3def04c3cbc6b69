//! Modelo de Alert
//!
//! Las alertas son la única entidad que el núcleo crea. Una vez creadas sólo
//! cambian por acción del usuario (leída / descartada), fuera de este crate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Tipo de alerta - mapea al ENUM alert_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    FuelAnomaly,
    ConsumptionAnomaly,
    MaintenanceDue,
    MaintenanceOverdue,
    VehicleAge,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::FuelAnomaly => "fuel_anomaly",
            AlertType::ConsumptionAnomaly => "consumption_anomaly",
            AlertType::MaintenanceDue => "maintenance_due",
            AlertType::MaintenanceOverdue => "maintenance_overdue",
            AlertType::VehicleAge => "vehicle_age",
        }
    }

    /// Ventana mínima entre dos alertas del mismo tipo para un vehículo
    pub fn cooldown(&self) -> Cooldown {
        match self {
            AlertType::FuelAnomaly => Cooldown::Days(7),
            AlertType::ConsumptionAnomaly => Cooldown::Days(14),
            AlertType::MaintenanceDue | AlertType::MaintenanceOverdue => Cooldown::Days(7),
            AlertType::VehicleAge => Cooldown::Days(90),
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severidad - mapea al ENUM alert_severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "alert_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

/// Ventana de deduplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cooldown {
    Days(i64),
    /// La alerta se emite una sola vez por vehículo y tipo
    Forever,
}

impl Cooldown {
    /// Fecha mínima de creación de una alerta que todavía suprime a la nueva.
    /// `None` significa sin límite inferior.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Cooldown::Days(days) => Some(now - Duration::days(*days)),
            Cooldown::Forever => None,
        }
    }
}

/// Destinatario de la alerta: vehículo y/o dueño
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTarget {
    pub vehicle_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
}

impl AlertTarget {
    pub fn vehicle(vehicle_id: Uuid, owner_id: Uuid) -> Self {
        Self {
            vehicle_id: Some(vehicle_id),
            owner_id: Some(owner_id),
        }
    }
}

/// Alert persistida - mapea la tabla alerts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub metadata: sqlx::types::Json<serde_json::Value>,
    pub is_active: bool,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub created_at: DateTime<Utc>,
}

/// Alerta todavía no emitida
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub target: AlertTarget,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
    pub cooldown: Cooldown,
}

impl AlertDraft {
    pub fn new(
        target: AlertTarget,
        alert_type: AlertType,
        severity: AlertSeverity,
        title: impl Into<String>,
        message: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            target,
            alert_type,
            severity,
            title: title.into(),
            message: message.into(),
            metadata,
            cooldown: alert_type.cooldown(),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Cooldown) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Construir la alerta persistible con id y fecha de creación
    pub fn into_alert(self, now: DateTime<Utc>) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            vehicle_id: self.target.vehicle_id,
            owner_id: self.target.owner_id,
            alert_type: self.alert_type,
            severity: self.severity,
            title: self.title,
            message: self.message,
            metadata: sqlx::types::Json(self.metadata),
            is_active: true,
            is_read: false,
            is_dismissed: false,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cooldowns_per_type() {
        assert_eq!(AlertType::FuelAnomaly.cooldown(), Cooldown::Days(7));
        assert_eq!(AlertType::ConsumptionAnomaly.cooldown(), Cooldown::Days(14));
        assert_eq!(AlertType::VehicleAge.cooldown(), Cooldown::Days(90));
    }

    #[test]
    fn test_window_start() {
        let now = Utc::now();
        assert_eq!(Cooldown::Days(7).window_start(now), Some(now - Duration::days(7)));
        assert_eq!(Cooldown::Forever.window_start(now), None);
    }

    #[test]
    fn test_draft_into_alert() {
        let now = Utc::now();
        let target = AlertTarget::vehicle(Uuid::new_v4(), Uuid::new_v4());
        let draft = AlertDraft::new(
            target,
            AlertType::VehicleAge,
            AlertSeverity::Warning,
            "Vehículo antiguo",
            "12 años",
            json!({ "age_years": 12 }),
        );
        assert_eq!(draft.cooldown, Cooldown::Days(90));

        let alert = draft.into_alert(now);
        assert_eq!(alert.vehicle_id, target.vehicle_id);
        assert_eq!(alert.created_at, now);
        assert!(alert.is_active && !alert.is_read && !alert.is_dismissed);
        assert_eq!(alert.metadata.0["age_years"], 12);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_value(AlertSeverity::Critical).unwrap(), json!("critical"));
        assert_eq!(serde_json::to_value(AlertType::FuelAnomaly).unwrap(), json!("fuel_anomaly"));
    }
}
