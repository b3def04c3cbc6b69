#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use fleet_health::models::{FuelRecord, MaintenanceRecord, MaintenanceType, Vehicle};
use fleet_health::repositories::InMemoryStore;
use fleet_health::services::{BatchRunner, DisabledNotifier};

/// Fecha fija de los escenarios: 2026-06-30
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub fn now() -> DateTime<Utc> {
    Utc.from_utc_datetime(&today().and_hms_opt(9, 0, 0).unwrap())
}

pub fn vehicle(owner_id: Uuid, year: i32) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        owner_id,
        name: "Corolla".to_string(),
        brand: Some("Toyota".to_string()),
        model: Some("Corolla XEi".to_string()),
        year,
        license_plate: Some("QWE4R56".to_string()),
        fuel_type: "gasoline".to_string(),
        is_active: true,
        created_at: now() - Duration::days(400),
    }
}

pub fn fuel(vehicle_id: Uuid, date: NaiveDate, odometer: f64, liters: f64) -> FuelRecord {
    FuelRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        date,
        odometer: Some(odometer),
        liters,
        total_cost: Decimal::new((liters * 590.0).round() as i64, 2),
        price_per_liter: Some(Decimal::new(590, 2)),
        gas_station: Some("Posto Ipiranga".to_string()),
        fuel_type: "gasoline".to_string(),
        created_at: Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap()),
    }
}

pub fn maintenance(vehicle_id: Uuid, kind: MaintenanceType, date: NaiveDate, km: Option<i32>) -> MaintenanceRecord {
    MaintenanceRecord {
        id: Uuid::new_v4(),
        vehicle_id,
        maintenance_type: kind,
        date,
        description: kind.display_name().to_string(),
        cost: Some(Decimal::new(25_000, 2)),
        km_at_service: km,
        service_interval_km: None,
        service_interval_months: None,
        next_service_km: None,
        next_service_date: None,
        created_at: Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap()),
    }
}

/// Abastecimientos cada 10 días hasta hoy con los saltos de km indicados (40 litros)
pub fn fill_history(vehicle_id: Uuid, first_km: f64, steps: &[f64]) -> Vec<FuelRecord> {
    let count = steps.len() as i64;
    let mut km = first_km;
    let mut records = vec![fuel(vehicle_id, days_ago(count * 10), km, 40.0)];
    for (i, step) in steps.iter().enumerate() {
        km += step;
        records.push(fuel(vehicle_id, days_ago((count - 1 - i as i64) * 10), km, 40.0));
    }
    records
}

pub fn runner(store: &InMemoryStore) -> BatchRunner {
    let shared = Arc::new(store.clone());
    BatchRunner::new(shared.clone(), shared, Arc::new(DisabledNotifier))
}
