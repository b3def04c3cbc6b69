//! Runner de chequeos
//!
//! Una pasada secuencial sobre todos los vehículos activos. Cada vehículo se
//! evalúa sobre una única lectura de sus registros; un fallo en un vehículo
//! se registra y no interrumpe a los demás.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use super::alert_emitter::{AlertEmitter, EmitOutcome};
use super::alert_rules::{maintenance_alerts, vehicle_age_alert};
use super::anomaly_detector::detect_anomalies;
use super::notifier::Notifier;
use crate::models::{AlertDraft, FuelRecord, MaintenanceRecord, Vehicle};
use crate::repositories::{AlertStore, RecordStore};
use crate::utils::errors::AppResult;

/// Resumen de una ejecución
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub alerts_created: usize,
    pub alerts_suppressed: usize,
    /// Alertas cuya escritura falló; se reintentan en la próxima ejecución
    pub alerts_failed: usize,
    pub vehicles_checked: usize,
    pub vehicles_failed: usize,
    /// Registros de mantenimiento con próximo servicio actualizado
    pub next_due_updated: usize,
}

/// Registros de un vehículo leídos una sola vez por ejecución
#[derive(Debug, Clone)]
pub struct VehicleSnapshot {
    /// Orden ascendente por fecha
    pub fuel_records: Vec<FuelRecord>,
    /// Orden descendente por fecha
    pub maintenance_records: Vec<MaintenanceRecord>,
}

impl VehicleSnapshot {
    pub async fn load(records: &dyn RecordStore, vehicle: &Vehicle) -> AppResult<Self> {
        Ok(Self {
            fuel_records: records.fuel_records(vehicle.id, None, None).await?,
            maintenance_records: records.maintenance_records(vehicle.id).await?,
        })
    }
}

/// Todos los borradores de alerta de un vehículo en el instante `now`
pub fn collect_drafts(vehicle: &Vehicle, snapshot: &VehicleSnapshot, now: DateTime<Utc>) -> Vec<AlertDraft> {
    let today = now.date_naive();
    let mut drafts = detect_anomalies(vehicle, &snapshot.fuel_records, today);
    drafts.extend(maintenance_alerts(
        vehicle,
        &snapshot.maintenance_records,
        &snapshot.fuel_records,
        today,
    ));
    drafts.extend(vehicle_age_alert(vehicle, now.year()));
    drafts
}

#[derive(Clone)]
pub struct BatchRunner {
    records: Arc<dyn RecordStore>,
    emitter: AlertEmitter,
}

impl BatchRunner {
    pub fn new(records: Arc<dyn RecordStore>, alerts: Arc<dyn AlertStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            records,
            emitter: AlertEmitter::new(alerts, notifier),
        }
    }

    pub async fn run_checks(&self) -> AppResult<RunSummary> {
        self.run_checks_at(Utc::now()).await
    }

    /// Ejecuta la pasada con un reloj explícito.
    ///
    /// Sólo falla si no se puede obtener la lista de vehículos.
    pub async fn run_checks_at(&self, now: DateTime<Utc>) -> AppResult<RunSummary> {
        let started = Instant::now();
        let vehicles = self.records.list_active_vehicles().await?;
        tracing::info!("🔎 Iniciando chequeos para {} vehículos activos", vehicles.len());

        let mut summary = RunSummary::default();
        for vehicle in &vehicles {
            summary.vehicles_checked += 1;
            if let Err(e) = self.check_vehicle(vehicle, now, &mut summary).await {
                summary.vehicles_failed += 1;
                tracing::error!(vehicle_id = %vehicle.id, "❌ Falló el chequeo del vehículo: {}", e);
            }
        }

        tracing::info!(
            alerts_created = summary.alerts_created,
            alerts_suppressed = summary.alerts_suppressed,
            alerts_failed = summary.alerts_failed,
            vehicles_failed = summary.vehicles_failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "✅ Chequeos completados"
        );
        Ok(summary)
    }

    /// Las alertas se suman al resumen a medida que se emiten; un fallo
    /// posterior del vehículo no las descuenta
    async fn check_vehicle(&self, vehicle: &Vehicle, now: DateTime<Utc>, summary: &mut RunSummary) -> AppResult<()> {
        let snapshot = VehicleSnapshot::load(self.records.as_ref(), vehicle).await?;

        for draft in collect_drafts(vehicle, &snapshot, now) {
            let alert_type = draft.alert_type;
            match self.emitter.emit(draft, now).await {
                Ok(EmitOutcome::Created(_)) => summary.alerts_created += 1,
                Ok(EmitOutcome::Suppressed { .. }) => summary.alerts_suppressed += 1,
                Err(e) => {
                    summary.alerts_failed += 1;
                    tracing::error!(
                        vehicle_id = %vehicle.id,
                        alert_type = %alert_type,
                        "❌ No se pudo guardar la alerta: {}",
                        e
                    );
                }
            }
        }

        self.write_back_next_due(&snapshot.maintenance_records, summary).await
    }

    /// Persiste km y fecha de próximo servicio sólo cuando cambiaron
    async fn write_back_next_due(&self, records: &[MaintenanceRecord], summary: &mut RunSummary) -> AppResult<()> {
        for record in records {
            let next_km = record.next_due_km();
            let next_date = record.next_due_date();
            if next_km == record.next_service_km && next_date == record.next_service_date {
                continue;
            }
            self.records.update_next_due(record.id, next_km, next_date).await?;
            tracing::debug!(record_id = %record.id, ?next_km, ?next_date, "Próximo servicio actualizado");
            summary.next_due_updated += 1;
        }
        Ok(())
    }
}
