//! Repositorios
//!
//! Interfaces de acceso a datos que consume el núcleo de alertas, con su
//! implementación PostgreSQL y una implementación en memoria.

pub mod alert_repository;
pub mod memory;
pub mod vehicle_repository;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Alert, AlertType, FuelRecord, MaintenanceRecord, Vehicle};
use crate::utils::errors::AppResult;

pub use alert_repository::AlertRepository;
pub use memory::InMemoryStore;
pub use vehicle_repository::VehicleRepository;

/// Vista de sólo lectura de vehículos y sus registros históricos.
///
/// La única escritura permitida son los campos derivados de próximo servicio
/// de un registro de mantenimiento.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_active_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    async fn find_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<Vehicle>>;

    /// Vehículos activos de un dueño
    async fn vehicles_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Vehicle>>;

    /// Abastecimientos ordenados por fecha ascendente, con rango opcional inclusivo
    async fn fuel_records(
        &self,
        vehicle_id: Uuid,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> AppResult<Vec<FuelRecord>>;

    /// Mantenimientos ordenados por fecha descendente
    async fn maintenance_records(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>>;

    async fn update_next_due(
        &self,
        record_id: Uuid,
        next_service_km: Option<i32>,
        next_service_date: Option<NaiveDate>,
    ) -> AppResult<()>;
}

/// Consulta y escritura de alertas
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Alerta activa más reciente del par (vehículo, tipo) creada desde `created_after`
    async fn find_alert(
        &self,
        vehicle_id: Option<Uuid>,
        alert_type: AlertType,
        created_after: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Alert>>;

    /// Inserción atómica de una alerta
    async fn create_alert(&self, alert: &Alert) -> AppResult<Alert>;

    /// Alertas activas, más recientes primero
    async fn active_alerts(&self, vehicle_id: Option<Uuid>, limit: i64) -> AppResult<Vec<Alert>>;
}
