use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Vehicle;
use crate::services::efficiency::EfficiencySummary;
use crate::services::fleet_summary::SummaryFilter;
use crate::services::maintenance_projector::MaintenanceOverview;

// Datos básicos del vehículo en las respuestas
#[derive(Debug, Serialize)]
pub struct VehicleInfo {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: i32,
    pub license_plate: Option<String>,
    pub fuel_type: String,
}

impl From<Vehicle> for VehicleInfo {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            owner_id: vehicle.owner_id,
            name: vehicle.name,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            license_plate: vehicle.license_plate,
            fuel_type: vehicle.fuel_type,
        }
    }
}

// Response de eficiencia de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleEfficiencyResponse {
    pub vehicle: VehicleInfo,
    pub efficiency: EfficiencySummary,
    pub recent_expense: Decimal,
}

// Response de mantenimiento de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleMaintenanceResponse {
    pub vehicle: VehicleInfo,
    #[serde(flatten)]
    pub overview: MaintenanceOverview,
}

// Filtros del resumen de flota
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OwnerSummaryQuery {
    pub vehicle_id: Option<Uuid>,
    #[validate(range(min = 1, max = 3650))]
    pub days: Option<i64>,
}

impl From<OwnerSummaryQuery> for SummaryFilter {
    fn from(query: OwnerSummaryQuery) -> Self {
        Self {
            vehicle_id: query.vehicle_id,
            days: query.days,
        }
    }
}
