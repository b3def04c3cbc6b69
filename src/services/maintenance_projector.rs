//! Proyector de vencimientos de mantenimiento
//!
//! Calcula, para cada registro de mantenimiento, el km y la fecha del próximo
//! servicio, la distancia restante contra el último odómetro conocido y una
//! proyección continua de la fecha de vencimiento según el uso reciente.
//!
//! El estado (`NoHistory → Scheduled → DueSoon → Overdue`) no se persiste:
//! se recalcula en cada ejecución a partir de los registros.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::outcome::{InsufficientReason, Outcome};
use crate::models::maintenance::DAYS_PER_MONTH;
use crate::models::{FuelRecord, MaintenanceRecord, MaintenanceType};

/// Ventana de abastecimientos usada para estimar el uso mensual
pub const USAGE_WINDOW_DAYS: i64 = 90;

/// Umbrales de "próximo a vencer"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DueThresholds {
    pub warning_km: f64,
    pub warning_days: i64,
}

impl Default for DueThresholds {
    fn default() -> Self {
        Self {
            warning_km: 500.0,
            warning_days: 30,
        }
    }
}

impl DueThresholds {
    /// Umbrales del catálogo (el aceite usa 300 km / 15 días)
    pub fn for_type(kind: MaintenanceType) -> Self {
        let schedule = kind.schedule();
        Self {
            warning_km: schedule.due_soon_km,
            warning_days: schedule.due_soon_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    NoHistory,
    Scheduled,
    DueSoon,
    Overdue,
}

/// Uso mensual estimado a partir del odómetro
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageRate {
    pub km_per_month: f64,
    pub window_km: f64,
    pub window_days: i64,
}

/// Proyección de la fecha de vencimiento
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DueProjection {
    pub months_until_due: f64,
    pub projected_date: NaiveDate,
    pub km_per_month: f64,
}

/// Estado puntual de una obligación de mantenimiento
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceStatus {
    pub maintenance_type: MaintenanceType,
    pub record_id: Option<Uuid>,
    pub last_service_date: Option<NaiveDate>,
    pub next_due_km: Option<i32>,
    pub next_due_date: Option<NaiveDate>,
    /// Distancia restante, nunca negativa
    pub remaining_km: Outcome<f64>,
    /// Km recorridos después del próximo servicio (si ya pasó)
    pub overdue_km: Option<f64>,
    /// Días hasta la fecha de próximo servicio (negativo si ya pasó)
    pub days_remaining: Option<i64>,
    pub state: DueState,
    pub projection: Outcome<DueProjection>,
}

/// Último odómetro conocido: el abastecimiento más reciente con lectura
pub fn latest_odometer(records: &[FuelRecord]) -> Option<f64> {
    records
        .iter()
        .filter(|r| r.odometer.is_some())
        .max_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)))
        .and_then(|r| r.odometer)
}

/// Diferencia con signo entre el km del próximo servicio y el odómetro actual
fn distance_delta(record: &MaintenanceRecord, latest_odometer: Option<f64>) -> Outcome<f64> {
    if record.effective_interval_km().is_none() {
        return Outcome::InsufficientData(InsufficientReason::MissingInterval);
    }
    let Some(next_due_km) = record.next_due_km() else {
        return Outcome::InsufficientData(InsufficientReason::MissingServiceOdometer);
    };
    match latest_odometer {
        Some(current) => Outcome::Computed(f64::from(next_due_km) - current),
        None => Outcome::InsufficientData(InsufficientReason::NoOdometerReading),
    }
}

/// Distancia restante hasta el próximo servicio, con piso en cero
pub fn remaining_distance(record: &MaintenanceRecord, latest_odometer: Option<f64>) -> Outcome<f64> {
    distance_delta(record, latest_odometer).map(|delta| delta.max(0.0))
}

/// Uso mensual con los abastecimientos con odómetro de los últimos 90 días
pub fn usage_rate(records: &[FuelRecord], today: NaiveDate) -> Outcome<UsageRate> {
    let window_start = today - Duration::days(USAGE_WINDOW_DAYS);
    let mut window: Vec<(NaiveDate, f64)> = records
        .iter()
        .filter(|r| r.date >= window_start && r.date <= today)
        .filter_map(|r| r.odometer.map(|km| (r.date, km)))
        .collect();
    window.sort_by_key(|(date, _)| *date);

    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Outcome::InsufficientData(InsufficientReason::TooFewRecords);
    };
    if window.len() < 2 {
        return Outcome::InsufficientData(InsufficientReason::TooFewRecords);
    }

    let window_km = last.1 - first.1;
    let window_days = (last.0 - first.0).num_days();
    if window_days <= 0 || window_km <= 0.0 {
        return Outcome::InsufficientData(InsufficientReason::NonPositiveWindow);
    }

    Outcome::Computed(UsageRate {
        km_per_month: window_km / window_days as f64 * DAYS_PER_MONTH as f64,
        window_km,
        window_days,
    })
}

/// Meses hasta el vencimiento y fecha proyectada
pub fn project_due_date(remaining_km: f64, rate: &UsageRate, now: DateTime<Utc>) -> Outcome<DueProjection> {
    if remaining_km <= 0.0 {
        return Outcome::InsufficientData(InsufficientReason::AlreadyDue);
    }
    if rate.km_per_month <= 0.0 {
        return Outcome::InsufficientData(InsufficientReason::NonPositiveWindow);
    }

    let months_until_due = remaining_km / rate.km_per_month;
    let seconds = (months_until_due * DAYS_PER_MONTH as f64 * 86_400.0).round() as i64;
    let projected = Duration::try_seconds(seconds).and_then(|offset| now.checked_add_signed(offset));
    let Some(projected) = projected else {
        return Outcome::Failed(format!("projection out of range for {:.0} months", months_until_due));
    };

    Outcome::Computed(DueProjection {
        months_until_due,
        projected_date: projected.date_naive(),
        km_per_month: rate.km_per_month,
    })
}

/// Evalúa un registro con umbrales explícitos
pub fn evaluate_with(
    record: &MaintenanceRecord,
    fuel_records: &[FuelRecord],
    thresholds: DueThresholds,
    now: DateTime<Utc>,
) -> MaintenanceStatus {
    let today = now.date_naive();
    let latest = latest_odometer(fuel_records);
    let delta = distance_delta(record, latest);
    let next_due_date = record.next_due_date();
    let days_remaining = next_due_date.map(|date| (date - today).num_days());

    let mut state = DueState::Scheduled;
    if let Some(delta) = delta.computed() {
        state = state.max(state_for(*delta <= 0.0, *delta <= thresholds.warning_km));
    }
    if let Some(days) = days_remaining {
        state = state.max(state_for(days <= 0, days <= thresholds.warning_days));
    }

    let remaining_km = delta.clone().map(|d| d.max(0.0));
    let projection = remaining_km.clone().and_then(|remaining| {
        if remaining <= 0.0 {
            return Outcome::InsufficientData(InsufficientReason::AlreadyDue);
        }
        usage_rate(fuel_records, today).and_then(|rate| project_due_date(remaining, &rate, now))
    });

    MaintenanceStatus {
        maintenance_type: record.maintenance_type,
        record_id: Some(record.id),
        last_service_date: Some(record.date),
        next_due_km: record.next_due_km(),
        next_due_date,
        remaining_km,
        overdue_km: delta.computed().filter(|d| **d < 0.0).map(|d| -d),
        days_remaining,
        state,
        projection,
    }
}

fn state_for(overdue: bool, due_soon: bool) -> DueState {
    if overdue {
        DueState::Overdue
    } else if due_soon {
        DueState::DueSoon
    } else {
        DueState::Scheduled
    }
}

/// Evalúa un registro con los umbrales de su tipo
pub fn evaluate(record: &MaintenanceRecord, fuel_records: &[FuelRecord], now: DateTime<Utc>) -> MaintenanceStatus {
    evaluate_with(record, fuel_records, DueThresholds::for_type(record.maintenance_type), now)
}

/// Último registro de cada tipo presente en el historial
pub fn latest_per_type(records: &[MaintenanceRecord]) -> Vec<&MaintenanceRecord> {
    let mut latest: Vec<&MaintenanceRecord> = Vec::new();
    for record in records {
        match latest
            .iter_mut()
            .find(|r| r.maintenance_type == record.maintenance_type)
        {
            Some(current) => {
                if (record.date, record.created_at) > (current.date, current.created_at) {
                    *current = record;
                }
            }
            None => latest.push(record),
        }
    }
    latest
}

/// Estado de cada tipo de mantenimiento registrado para el vehículo
pub fn vehicle_maintenance_status(
    maintenance: &[MaintenanceRecord],
    fuel_records: &[FuelRecord],
    now: DateTime<Utc>,
) -> Vec<MaintenanceStatus> {
    latest_per_type(maintenance)
        .into_iter()
        .map(|record| evaluate(record, fuel_records, now))
        .collect()
}

/// Estado de un tipo concreto; `NoHistory` si nunca se registró
pub fn status_for_type(
    kind: MaintenanceType,
    maintenance: &[MaintenanceRecord],
    fuel_records: &[FuelRecord],
    now: DateTime<Utc>,
) -> MaintenanceStatus {
    let latest = latest_per_type(maintenance)
        .into_iter()
        .find(|r| r.maintenance_type == kind);

    match latest {
        Some(record) => evaluate(record, fuel_records, now),
        None => MaintenanceStatus {
            maintenance_type: kind,
            record_id: None,
            last_service_date: None,
            next_due_km: None,
            next_due_date: None,
            remaining_km: Outcome::InsufficientData(InsufficientReason::TooFewRecords),
            overdue_km: None,
            days_remaining: None,
            state: DueState::NoHistory,
            projection: Outcome::InsufficientData(InsufficientReason::TooFewRecords),
        },
    }
}

/// Vista de mantenimiento de un vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceOverview {
    pub has_history: bool,
    pub latest_odometer: Option<f64>,
    pub usage: Outcome<UsageRate>,
    pub items: Vec<MaintenanceStatus>,
    /// Próximo cambio de aceite con proyección de fecha
    pub oil_change: MaintenanceStatus,
}

pub fn maintenance_overview(
    maintenance: &[MaintenanceRecord],
    fuel_records: &[FuelRecord],
    now: DateTime<Utc>,
) -> MaintenanceOverview {
    MaintenanceOverview {
        has_history: !maintenance.is_empty(),
        latest_odometer: latest_odometer(fuel_records),
        usage: usage_rate(fuel_records, now.date_naive()),
        items: vehicle_maintenance_status(maintenance, fuel_records, now),
        oil_change: status_for_type(MaintenanceType::Oil, maintenance, fuel_records, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, fuel_on, maintenance, noon};

    fn oil_at(km: Option<i32>, interval_km: Option<i32>) -> MaintenanceRecord {
        let mut record = maintenance(Uuid::nil(), MaintenanceType::Oil, day(0), km);
        record.service_interval_km = interval_km;
        record
    }

    #[test]
    fn test_remaining_distance_and_due_soon() {
        let record = oil_at(Some(10_000), Some(10_000));
        let fuel = vec![fuel_on(Uuid::nil(), day(20), Some(19_800.0), 40.0)];

        assert_eq!(remaining_distance(&record, latest_odometer(&fuel)), Outcome::Computed(200.0));

        let status = evaluate_with(&record, &fuel, DueThresholds::default(), noon(day(21)));
        assert_eq!(status.remaining_km, Outcome::Computed(200.0));
        assert_eq!(status.state, DueState::DueSoon);
    }

    #[test]
    fn test_remaining_distance_floors_at_zero() {
        let record = oil_at(Some(10_000), Some(10_000));
        assert_eq!(remaining_distance(&record, Some(21_000.0)), Outcome::Computed(0.0));

        let fuel = vec![fuel_on(Uuid::nil(), day(20), Some(21_000.0), 40.0)];
        let status = evaluate(&record, &fuel, noon(day(21)));
        assert_eq!(status.state, DueState::Overdue);
        assert_eq!(status.overdue_km, Some(1_000.0));
        assert_eq!(status.projection, Outcome::InsufficientData(InsufficientReason::AlreadyDue));
    }

    #[test]
    fn test_missing_service_odometer_is_unknown() {
        let record = oil_at(None, Some(10_000));
        assert_eq!(
            remaining_distance(&record, Some(12_000.0)),
            Outcome::InsufficientData(InsufficientReason::MissingServiceOdometer)
        );
    }

    #[test]
    fn test_missing_odometer_reading_is_unknown() {
        let record = oil_at(Some(10_000), Some(10_000));
        let fuel = vec![fuel_on(Uuid::nil(), day(3), None, 40.0)];
        assert_eq!(latest_odometer(&fuel), None);
        assert_eq!(
            remaining_distance(&record, None),
            Outcome::InsufficientData(InsufficientReason::NoOdometerReading)
        );
    }

    #[test]
    fn test_calendar_only_interval_is_unknown_for_distance() {
        let mut battery = maintenance(Uuid::nil(), MaintenanceType::Battery, day(0), None);
        battery.service_interval_months = Some(36);
        assert_eq!(
            remaining_distance(&battery, Some(50_000.0)),
            Outcome::InsufficientData(InsufficientReason::MissingInterval)
        );
        let status = evaluate(&battery, &[], noon(day(10)));
        assert_eq!(status.days_remaining, Some(36 * 30 - 10));
        assert_eq!(status.state, DueState::Scheduled);
    }

    #[test]
    fn test_calendar_due_soon_and_overdue() {
        let mut filter = maintenance(Uuid::nil(), MaintenanceType::FilterAir, day(0), None);
        filter.service_interval_months = Some(1);

        let soon = evaluate(&filter, &[], noon(day(10)));
        assert_eq!(soon.days_remaining, Some(20));
        assert_eq!(soon.state, DueState::DueSoon);

        let overdue = evaluate(&filter, &[], noon(day(31)));
        assert_eq!(overdue.days_remaining, Some(-1));
        assert_eq!(overdue.state, DueState::Overdue);
    }

    #[test]
    fn test_oil_uses_tighter_thresholds() {
        let record = oil_at(Some(10_000), Some(10_000));
        let fuel = vec![fuel_on(Uuid::nil(), day(20), Some(19_600.0), 40.0)];
        assert_eq!(evaluate(&record, &fuel, noon(day(21))).state, DueState::Scheduled);
        assert_eq!(
            evaluate_with(&record, &fuel, DueThresholds::default(), noon(day(21))).state,
            DueState::DueSoon
        );
    }

    #[test]
    fn test_usage_rate_and_projection() {
        let fuel = vec![
            fuel_on(Uuid::nil(), day(10), Some(10_000.0), 40.0),
            fuel_on(Uuid::nil(), day(55), Some(11_500.0), 40.0),
            fuel_on(Uuid::nil(), day(100), Some(13_000.0), 40.0),
        ];
        let now = noon(day(100));
        let rate = usage_rate(&fuel, now.date_naive()).into_computed().unwrap();
        assert_eq!(rate.window_km, 3_000.0);
        assert_eq!(rate.window_days, 90);
        assert!((rate.km_per_month - 1_000.0).abs() < 1e-9);

        let projection = project_due_date(500.0, &rate, now).into_computed().unwrap();
        assert!((projection.months_until_due - 0.5).abs() < 1e-9);
        assert_eq!(projection.projected_date, day(115));
    }

    #[test]
    fn test_projection_out_of_range_fails_without_panic() {
        let record = oil_at(Some(2_000_000_000), None);
        let fuel = vec![
            fuel_on(Uuid::nil(), day(0), Some(10_000.0), 40.0),
            fuel_on(Uuid::nil(), day(90), Some(10_000.1), 40.0),
        ];

        let status = evaluate(&record, &fuel, noon(day(90)));
        assert!(status.remaining_km.computed().is_some());
        assert!(matches!(status.projection, Outcome::Failed(_)));
    }

    #[test]
    fn test_usage_rate_ignores_records_outside_window() {
        let fuel = vec![
            fuel_on(Uuid::nil(), day(0), Some(1_000.0), 40.0),
            fuel_on(Uuid::nil(), day(100), Some(13_000.0), 40.0),
        ];
        assert_eq!(
            usage_rate(&fuel, day(100)),
            Outcome::InsufficientData(InsufficientReason::TooFewRecords)
        );
    }

    #[test]
    fn test_usage_rate_requires_positive_window() {
        let same_day = vec![
            fuel_on(Uuid::nil(), day(5), Some(1_000.0), 40.0),
            fuel_on(Uuid::nil(), day(5), Some(1_400.0), 40.0),
        ];
        assert_eq!(
            usage_rate(&same_day, day(10)),
            Outcome::InsufficientData(InsufficientReason::NonPositiveWindow)
        );

        let backwards = vec![
            fuel_on(Uuid::nil(), day(5), Some(2_000.0), 40.0),
            fuel_on(Uuid::nil(), day(8), Some(1_400.0), 40.0),
        ];
        assert_eq!(
            usage_rate(&backwards, day(10)),
            Outcome::InsufficientData(InsufficientReason::NonPositiveWindow)
        );
    }

    #[test]
    fn test_latest_per_type_and_no_history() {
        let vehicle_id = Uuid::new_v4();
        let old = maintenance(vehicle_id, MaintenanceType::Oil, day(0), Some(5_000));
        let new = maintenance(vehicle_id, MaintenanceType::Oil, day(60), Some(10_000));
        let brakes = maintenance(vehicle_id, MaintenanceType::Brakes, day(30), Some(8_000));
        let records = vec![old, new.clone(), brakes];

        let latest = latest_per_type(&records);
        assert_eq!(latest.len(), 2);
        assert!(latest.iter().any(|r| r.id == new.id));

        let tires = status_for_type(MaintenanceType::Tires, &records, &[], noon(day(61)));
        assert_eq!(tires.state, DueState::NoHistory);
    }

    #[test]
    fn test_overview_projects_oil_change() {
        let vehicle_id = Uuid::new_v4();
        let oil = maintenance(vehicle_id, MaintenanceType::Oil, day(10), Some(10_000));
        let fuel = vec![
            fuel_on(vehicle_id, day(10), Some(10_000.0), 40.0),
            fuel_on(vehicle_id, day(100), Some(19_500.0), 40.0),
        ];

        let overview = maintenance_overview(&[oil], &fuel, noon(day(100)));
        assert!(overview.has_history);
        assert_eq!(overview.latest_odometer, Some(19_500.0));
        assert_eq!(overview.items.len(), 1);
        assert_eq!(overview.oil_change.remaining_km, Outcome::Computed(500.0));
        // 9500 km en 90 días: los 500 km restantes son menos de cinco días de uso
        let projection = overview.oil_change.projection.into_computed().unwrap();
        assert!((projection.months_until_due - 500.0 / (9_500.0 / 3.0)).abs() < 1e-9);
        assert_eq!(projection.projected_date, day(105));
        assert_eq!(overview.oil_change.state, DueState::Scheduled);
    }
}
