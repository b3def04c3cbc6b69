//! Almacenamiento en memoria
//!
//! Implementa `RecordStore` y `AlertStore` sobre colecciones protegidas por
//! `RwLock`. Se usa en los tests y para ejecutar el servidor sin PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AlertStore, RecordStore};
use crate::models::{Alert, AlertType, FuelRecord, MaintenanceRecord, Vehicle};
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Inner {
    vehicles: Vec<Vehicle>,
    fuel_records: Vec<FuelRecord>,
    maintenance_records: Vec<MaintenanceRecord>,
    alerts: Vec<Alert>,
    /// Vehículos cuyas lecturas fallan (simula un store caído para ese vehículo)
    failing_vehicles: HashSet<Uuid>,
    fail_alert_writes: bool,
    fail_next_due_writes: bool,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_vehicle(&self, vehicle: Vehicle) {
        self.inner.write().await.vehicles.push(vehicle);
    }

    pub async fn add_fuel_record(&self, record: FuelRecord) {
        self.inner.write().await.fuel_records.push(record);
    }

    pub async fn add_maintenance_record(&self, record: MaintenanceRecord) {
        self.inner.write().await.maintenance_records.push(record);
    }

    /// Todas las alertas guardadas, en orden de creación
    pub async fn alerts(&self) -> Vec<Alert> {
        self.inner.read().await.alerts.clone()
    }

    pub async fn maintenance_record(&self, record_id: Uuid) -> Option<MaintenanceRecord> {
        self.inner
            .read()
            .await
            .maintenance_records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
    }

    pub async fn fail_reads_for(&self, vehicle_id: Uuid) {
        self.inner.write().await.failing_vehicles.insert(vehicle_id);
    }

    pub async fn set_fail_alert_writes(&self, fail: bool) {
        self.inner.write().await.fail_alert_writes = fail;
    }

    pub async fn set_fail_next_due_writes(&self, fail: bool) {
        self.inner.write().await.fail_next_due_writes = fail;
    }

    fn check_vehicle(inner: &Inner, vehicle_id: Uuid) -> AppResult<()> {
        if inner.failing_vehicles.contains(&vehicle_id) {
            return Err(AppError::Storage(format!(
                "records unavailable for vehicle {}",
                vehicle_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list_active_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let inner = self.inner.read().await;
        Ok(inner.vehicles.iter().filter(|v| v.is_active).cloned().collect())
    }

    async fn find_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<Vehicle>> {
        let inner = self.inner.read().await;
        Ok(inner.vehicles.iter().find(|v| v.id == vehicle_id).cloned())
    }

    async fn vehicles_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let inner = self.inner.read().await;
        Ok(inner
            .vehicles
            .iter()
            .filter(|v| v.is_active && v.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn fuel_records(
        &self,
        vehicle_id: Uuid,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> AppResult<Vec<FuelRecord>> {
        let inner = self.inner.read().await;
        Self::check_vehicle(&inner, vehicle_id)?;

        let mut records: Vec<FuelRecord> = inner
            .fuel_records
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .filter(|r| since.map_or(true, |d| r.date >= d))
            .filter(|r| until.map_or(true, |d| r.date <= d))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(records)
    }

    async fn maintenance_records(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let inner = self.inner.read().await;
        Self::check_vehicle(&inner, vehicle_id)?;

        let mut records: Vec<MaintenanceRecord> = inner
            .maintenance_records
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(records)
    }

    async fn update_next_due(
        &self,
        record_id: Uuid,
        next_service_km: Option<i32>,
        next_service_date: Option<NaiveDate>,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.fail_next_due_writes {
            return Err(AppError::Storage("maintenance record store rejected the write".to_string()));
        }
        let record = inner
            .maintenance_records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| AppError::NotFound(format!("maintenance record {}", record_id)))?;
        record.next_service_km = next_service_km;
        record.next_service_date = next_service_date;
        Ok(())
    }
}

#[async_trait]
impl AlertStore for InMemoryStore {
    async fn find_alert(
        &self,
        vehicle_id: Option<Uuid>,
        alert_type: AlertType,
        created_after: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Alert>> {
        let inner = self.inner.read().await;
        Ok(inner
            .alerts
            .iter()
            .filter(|a| a.is_active && a.vehicle_id == vehicle_id && a.alert_type == alert_type)
            .filter(|a| created_after.map_or(true, |after| a.created_at >= after))
            .max_by_key(|a| a.created_at)
            .cloned())
    }

    async fn create_alert(&self, alert: &Alert) -> AppResult<Alert> {
        let mut inner = self.inner.write().await;
        if inner.fail_alert_writes {
            return Err(AppError::Storage("alert store rejected the write".to_string()));
        }
        inner.alerts.push(alert.clone());
        Ok(alert.clone())
    }

    async fn active_alerts(&self, vehicle_id: Option<Uuid>, limit: i64) -> AppResult<Vec<Alert>> {
        let inner = self.inner.read().await;
        let mut alerts: Vec<Alert> = inner
            .alerts
            .iter()
            .filter(|a| a.is_active)
            .filter(|a| vehicle_id.map_or(true, |id| a.vehicle_id == Some(id)))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(alerts)
    }
}
