//! Constructores de datos para los tests unitarios

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{FuelRecord, MaintenanceRecord, MaintenanceType, Vehicle};

/// Día 0 de los escenarios de test
pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
}

pub fn day(offset: u32) -> NaiveDate {
    base_date() + Duration::days(i64::from(offset))
}

/// Mediodía UTC de la fecha indicada
pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}

pub fn vehicle(year: i32) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        name: "Onix".to_string(),
        brand: Some("Chevrolet".to_string()),
        model: Some("Onix LT".to_string()),
        year,
        license_plate: Some("BRA2E19".to_string()),
        fuel_type: "gasoline".to_string(),
        is_active: true,
        created_at: noon(base_date()),
    }
}

/// Abastecimiento `offset` días después del día 0
pub fn fuel(offset: u32, odometer: Option<f64>, liters: f64) -> FuelRecord {
    fuel_on(Uuid::nil(), day(offset), odometer, liters)
}

pub fn fuel_on(vehicle_id: Uuid, date: NaiveDate, odometer: Option<f64>, liters: f64) -> FuelRecord {
    FuelRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        date,
        odometer,
        liters,
        total_cost: Decimal::new((liters * 600.0).round() as i64, 2),
        price_per_liter: Some(Decimal::new(600, 2)),
        gas_station: None,
        fuel_type: "gasoline".to_string(),
        created_at: noon(date),
    }
}

pub fn maintenance(
    vehicle_id: Uuid,
    kind: MaintenanceType,
    date: NaiveDate,
    km_at_service: Option<i32>,
) -> MaintenanceRecord {
    MaintenanceRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        maintenance_type: kind,
        date,
        description: kind.display_name().to_string(),
        cost: None,
        km_at_service,
        service_interval_km: None,
        service_interval_months: None,
        next_service_km: None,
        next_service_date: None,
        created_at: noon(date),
    }
}
