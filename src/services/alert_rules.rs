//! Reglas de alertas categóricas
//!
//! Mantenimiento por tiempo y por distancia, primer mantenimiento y
//! antigüedad del vehículo. Todas las reglas son funciones puras sobre los
//! registros; la deduplicación queda a cargo del emisor.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use super::maintenance_projector::{latest_odometer, latest_per_type};
use crate::models::maintenance::DAYS_PER_MONTH;
use crate::models::{
    AlertDraft, AlertSeverity, AlertTarget, AlertType, Cooldown, FuelRecord, MaintenanceRecord,
    MaintenanceType, Vehicle,
};

/// Antigüedad a partir de la cual se avisa
pub const AGE_WARNING_YEARS: i32 = 10;
/// Antigüedad a partir de la cual el aviso es crítico
pub const AGE_CRITICAL_YEARS: i32 = 15;

/// Motivo de un hallazgo de mantenimiento
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingReason {
    /// Pasó el punto crítico de calendario (intervalo + tolerancia)
    TimeOverdue { days_overdue: i64 },
    /// Pasó el punto de aviso de calendario (intervalo - anticipación)
    TimeDueSoon { days_until_due: i64 },
    /// El odómetro superó el km del próximo servicio
    DistanceOverdue { km_overdue: f64 },
}

impl FindingReason {
    fn describe(&self) -> String {
        match self {
            FindingReason::TimeOverdue { days_overdue } => {
                format!("vencido hace {} días", days_overdue)
            }
            FindingReason::TimeDueSoon { days_until_due } if *days_until_due >= 0 => {
                format!("vence en {} días", days_until_due)
            }
            FindingReason::TimeDueSoon { days_until_due } => {
                format!("vencido hace {} días", -days_until_due)
            }
            FindingReason::DistanceOverdue { km_overdue } => {
                format!("excedido por {:.0} km", km_overdue)
            }
        }
    }
}

/// Resultado de evaluar el último servicio de un tipo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceFinding {
    pub maintenance_type: MaintenanceType,
    pub severity: AlertSeverity,
    pub last_service_date: NaiveDate,
    pub reasons: Vec<FindingReason>,
}

/// Regla por tiempo sobre un registro
fn time_finding(record: &MaintenanceRecord, today: NaiveDate) -> Option<(AlertSeverity, FindingReason)> {
    let schedule = record.schedule();
    let interval_days = i64::from(record.effective_interval_months()?) * DAYS_PER_MONTH;
    let elapsed = (today - record.date).num_days();

    if elapsed >= interval_days + schedule.critical_lag_days {
        Some((
            AlertSeverity::Critical,
            FindingReason::TimeOverdue {
                days_overdue: elapsed - interval_days,
            },
        ))
    } else if elapsed >= interval_days - schedule.warning_lead_days {
        Some((
            AlertSeverity::Warning,
            FindingReason::TimeDueSoon {
                days_until_due: interval_days - elapsed,
            },
        ))
    } else {
        None
    }
}

/// Regla por distancia sobre un registro
fn distance_finding(record: &MaintenanceRecord, current_odometer: Option<f64>) -> Option<(AlertSeverity, FindingReason)> {
    let next_due_km = f64::from(record.next_due_km()?);
    let current = current_odometer?;
    if current < next_due_km {
        return None;
    }

    let km_overdue = current - next_due_km;
    let severity = if km_overdue > record.schedule().critical_overdue_km {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };
    Some((severity, FindingReason::DistanceOverdue { km_overdue }))
}

/// Evalúa el último registro de cada tipo por tiempo y por distancia
pub fn maintenance_findings(
    maintenance: &[MaintenanceRecord],
    fuel_records: &[FuelRecord],
    today: NaiveDate,
) -> Vec<MaintenanceFinding> {
    let current_odometer = latest_odometer(fuel_records);

    latest_per_type(maintenance)
        .into_iter()
        .filter_map(|record| {
            let hits: Vec<(AlertSeverity, FindingReason)> = time_finding(record, today)
                .into_iter()
                .chain(distance_finding(record, current_odometer))
                .collect();
            let severity = hits.iter().map(|(severity, _)| *severity).max()?;

            Some(MaintenanceFinding {
                maintenance_type: record.maintenance_type,
                severity,
                last_service_date: record.date,
                reasons: hits.into_iter().map(|(_, reason)| reason).collect(),
            })
        })
        .collect()
}

fn finding_line(finding: &MaintenanceFinding) -> String {
    let reasons: Vec<String> = finding.reasons.iter().map(FindingReason::describe).collect();
    format!("{}: {}", finding.maintenance_type.display_name(), reasons.join(", "))
}

fn grouped_alert(
    vehicle: &Vehicle,
    findings: &[&MaintenanceFinding],
    alert_type: AlertType,
    severity: AlertSeverity,
    title: String,
) -> AlertDraft {
    let lines: Vec<String> = findings.iter().map(|f| finding_line(f)).collect();
    AlertDraft::new(
        AlertTarget::vehicle(vehicle.id, vehicle.owner_id),
        alert_type,
        severity,
        title,
        lines.join("\n"),
        json!({ "items": findings }),
    )
}

/// Alertas de mantenimiento de un vehículo.
///
/// Los hallazgos críticos se agrupan en una alerta `maintenance_overdue` y los
/// de aviso en una `maintenance_due`. Sin historial se emite, una única vez,
/// el pedido de registrar el primer mantenimiento.
pub fn maintenance_alerts(
    vehicle: &Vehicle,
    maintenance: &[MaintenanceRecord],
    fuel_records: &[FuelRecord],
    today: NaiveDate,
) -> Vec<AlertDraft> {
    if maintenance.is_empty() {
        return vec![first_maintenance_alert(vehicle)];
    }

    let findings = maintenance_findings(maintenance, fuel_records, today);
    let critical: Vec<&MaintenanceFinding> = findings
        .iter()
        .filter(|f| f.severity == AlertSeverity::Critical)
        .collect();
    let warning: Vec<&MaintenanceFinding> = findings
        .iter()
        .filter(|f| f.severity == AlertSeverity::Warning)
        .collect();

    let mut drafts = Vec::new();
    if !critical.is_empty() {
        drafts.push(grouped_alert(
            vehicle,
            &critical,
            AlertType::MaintenanceOverdue,
            AlertSeverity::Critical,
            format!("Mantenimiento vencido en {}", vehicle.display_name()),
        ));
    }
    if !warning.is_empty() {
        drafts.push(grouped_alert(
            vehicle,
            &warning,
            AlertType::MaintenanceDue,
            AlertSeverity::Warning,
            format!("Mantenimiento próximo en {}", vehicle.display_name()),
        ));
    }
    drafts
}

/// Pedido de registrar el primer mantenimiento (se emite una sola vez)
pub fn first_maintenance_alert(vehicle: &Vehicle) -> AlertDraft {
    AlertDraft::new(
        AlertTarget::vehicle(vehicle.id, vehicle.owner_id),
        AlertType::MaintenanceDue,
        AlertSeverity::Warning,
        format!("Registrá el primer mantenimiento de {}", vehicle.display_name()),
        "Todavía no hay mantenimientos registrados. Cargá el último servicio para recibir avisos de vencimiento.",
        json!({ "first_maintenance": true }),
    )
    .with_cooldown(Cooldown::Forever)
}

/// Alerta de antigüedad: aviso desde 10 años, crítica desde 15
pub fn vehicle_age_alert(vehicle: &Vehicle, current_year: i32) -> Option<AlertDraft> {
    let age = vehicle.age_in_years(current_year);
    let severity = match age {
        a if a >= AGE_CRITICAL_YEARS => AlertSeverity::Critical,
        a if a >= AGE_WARNING_YEARS => AlertSeverity::Warning,
        _ => return None,
    };

    Some(AlertDraft::new(
        AlertTarget::vehicle(vehicle.id, vehicle.owner_id),
        AlertType::VehicleAge,
        severity,
        format!("{} tiene {} años", vehicle.display_name(), age),
        "Los vehículos con más antigüedad requieren revisiones más frecuentes de frenos, suspensión y sistema eléctrico.",
        json!({ "age_years": age, "model_year": vehicle.year }),
    ))
}
