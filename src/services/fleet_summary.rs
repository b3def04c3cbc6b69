//! Resumen de flota de un dueño
//!
//! Agrega distancia, consumo y gastos de los vehículos activos del dueño. La
//! distancia y el consumo pasan por el mismo filtro de pares que el resto del
//! núcleo, aplicado por vehículo.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::consumption::{fill_samples, ConsumptionStats};
use crate::models::{FuelRecord, Vehicle};
use crate::repositories::RecordStore;
use crate::utils::errors::AppResult;

/// Abastecimientos recientes incluidos en el resumen
pub const RECENT_RECORDS: usize = 5;
const LAST_DAYS_WINDOW: i64 = 30;

/// Filtros opcionales del resumen
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SummaryFilter {
    pub vehicle_id: Option<Uuid>,
    /// Sólo abastecimientos de los últimos N días
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    pub total_vehicles: usize,
    pub total_records: usize,
    pub total_distance_km: f64,
    pub distance_last_30_days_km: f64,
    pub average_consumption: Option<f64>,
    pub best_consumption: Option<f64>,
    pub total_spent: Decimal,
    pub total_liters: f64,
    pub average_price_per_liter: Option<Decimal>,
    /// Gasto del mes en curso, o del período filtrado si se pidió `days`
    pub period_spent: Decimal,
    pub favorite_station: Option<String>,
    /// `YYYY-MM` → tipo de combustible → gasto
    pub monthly_spend_by_fuel: BTreeMap<String, BTreeMap<String, Decimal>>,
    /// `YYYY-MM` → gasto total
    pub monthly_spend: BTreeMap<String, Decimal>,
    pub liters_by_fuel: BTreeMap<String, f64>,
    pub recent_records: Vec<FuelRecord>,
}

/// Calcula el resumen a partir de los registros ya filtrados de cada vehículo
pub fn fleet_summary(
    fleet: &[(Vehicle, Vec<FuelRecord>)],
    filter: &SummaryFilter,
    today: NaiveDate,
) -> FleetSummary {
    let last_days_start = today - Duration::days(LAST_DAYS_WINDOW);
    let month_start = today.with_day(1).unwrap_or(today);

    let mut total_distance_km = 0.0;
    let mut distance_last_30_days_km = 0.0;
    let mut consumptions = Vec::new();
    for (_, records) in fleet {
        for sample in fill_samples(records) {
            total_distance_km += sample.distance_km;
            if sample.date >= last_days_start {
                distance_last_30_days_km += sample.distance_km;
            }
            consumptions.extend(sample.consumption);
        }
    }
    let stats = ConsumptionStats::from_values(&consumptions);

    let all: Vec<&FuelRecord> = fleet.iter().flat_map(|(_, records)| records.iter()).collect();

    let total_spent: Decimal = all.iter().map(|r| r.total_cost).sum();
    let total_liters: f64 = all.iter().map(|r| r.liters).sum();
    let prices: Vec<Decimal> = all.iter().filter_map(|r| r.unit_price()).collect();
    let average_price_per_liter = if prices.is_empty() {
        None
    } else {
        let sum: Decimal = prices.iter().sum();
        Some((sum / Decimal::from(prices.len())).round_dp(3))
    };

    let period_start = match filter.days {
        Some(_) => NaiveDate::MIN,
        None => month_start,
    };
    let period_spent: Decimal = all
        .iter()
        .filter(|r| r.date >= period_start)
        .map(|r| r.total_cost)
        .sum();

    let mut monthly_spend_by_fuel: BTreeMap<String, BTreeMap<String, Decimal>> = BTreeMap::new();
    let mut monthly_spend: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut liters_by_fuel: BTreeMap<String, f64> = BTreeMap::new();
    for record in &all {
        let month = record.date.format("%Y-%m").to_string();
        *monthly_spend_by_fuel
            .entry(month.clone())
            .or_default()
            .entry(record.fuel_type.clone())
            .or_default() += record.total_cost;
        *monthly_spend.entry(month).or_default() += record.total_cost;
        *liters_by_fuel.entry(record.fuel_type.clone()).or_default() += record.liters;
    }

    let mut recent_records: Vec<FuelRecord> = all.iter().map(|r| (*r).clone()).collect();
    recent_records.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    recent_records.truncate(RECENT_RECORDS);

    FleetSummary {
        total_vehicles: fleet.len(),
        total_records: all.len(),
        total_distance_km,
        distance_last_30_days_km,
        average_consumption: stats.map(|s| s.average),
        best_consumption: stats.map(|s| s.best),
        total_spent,
        total_liters,
        average_price_per_liter,
        period_spent,
        favorite_station: favorite_station(&all),
        monthly_spend_by_fuel,
        monthly_spend,
        liters_by_fuel,
        recent_records,
    }
}

/// Estación más frecuente; en caso de empate, la primera alfabéticamente
fn favorite_station(records: &[&FuelRecord]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for station in records.iter().filter_map(|r| r.gas_station.as_deref()) {
        let station = station.trim();
        if !station.is_empty() {
            *counts.entry(station).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
        .map(|(station, _)| station.to_string())
}

/// Lee los vehículos activos del dueño y sus abastecimientos y arma el resumen
pub async fn load_fleet_summary(
    records: &dyn RecordStore,
    owner_id: Uuid,
    filter: &SummaryFilter,
    today: NaiveDate,
) -> AppResult<FleetSummary> {
    let since = filter.days.map(|days| today - Duration::days(days));

    let mut fleet = Vec::new();
    for vehicle in records.vehicles_by_owner(owner_id).await? {
        if filter.vehicle_id.is_some_and(|id| id != vehicle.id) {
            continue;
        }
        let fuel = records.fuel_records(vehicle.id, since, None).await?;
        fleet.push((vehicle, fuel));
    }

    Ok(fleet_summary(&fleet, filter, today))
}
