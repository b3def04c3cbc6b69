use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::RecordStore;
use crate::models::{FuelRecord, MaintenanceRecord, Vehicle};
use crate::utils::errors::AppResult;

const FUEL_COLUMNS: &str = "id, vehicle_id, date, odometer, liters, total_cost, price_per_liter, \
                            gas_station, fuel_type, created_at";

const MAINTENANCE_COLUMNS: &str = "id, vehicle_id, maintenance_type, date, description, cost, \
                                   km_at_service, service_interval_km, service_interval_months, \
                                   next_service_km, next_service_date, created_at";

/// Acceso PostgreSQL a vehículos, abastecimientos y mantenimientos
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for VehicleRepository {
    async fn list_active_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE is_active = TRUE ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn find_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn vehicles_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE owner_id = $1 AND is_active = TRUE ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn fuel_records(
        &self,
        vehicle_id: Uuid,
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> AppResult<Vec<FuelRecord>> {
        let query = format!(
            r#"
            SELECT {}
            FROM fuel_records
            WHERE vehicle_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date ASC, created_at ASC
            "#,
            FUEL_COLUMNS
        );

        let records = sqlx::query_as::<_, FuelRecord>(&query)
            .bind(vehicle_id)
            .bind(since)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn maintenance_records(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let query = format!(
            "SELECT {} FROM maintenance_records WHERE vehicle_id = $1 ORDER BY date DESC, created_at DESC",
            MAINTENANCE_COLUMNS
        );

        let records = sqlx::query_as::<_, MaintenanceRecord>(&query)
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn update_next_due(
        &self,
        record_id: Uuid,
        next_service_km: Option<i32>,
        next_service_date: Option<NaiveDate>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE maintenance_records
            SET next_service_km = $2, next_service_date = $3
            WHERE id = $1
            "#,
        )
        .bind(record_id)
        .bind(next_service_km)
        .bind(next_service_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
