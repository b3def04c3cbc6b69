//! Detector de anomalías de consumo
//!
//! Dos chequeos independientes que pueden dispararse a la vez:
//! - ventana corta: los 3 últimos abastecimientos contra el promedio histórico (-20%)
//! - ventana media: últimos 30 días contra los 31-90 días anteriores (-15%)
//!
//! Ninguno modifica registros; sólo producen borradores de alerta.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use serde_json::json;

use super::consumption::{consumption_stats, fill_samples, mean};
use super::outcome::{InsufficientReason, Outcome};
use crate::models::{AlertDraft, AlertSeverity, AlertTarget, AlertType, FuelRecord, Vehicle};

/// Abastecimientos recientes evaluados por el chequeo corto
pub const SHORT_WINDOW_FILLS: usize = 3;
/// Registros mínimos para activar el chequeo corto
pub const SHORT_WINDOW_MIN_RECORDS: usize = 5;
const SHORT_WINDOW_MAX_RATIO: f64 = 0.80;

pub const RECENT_WINDOW_DAYS: i64 = 30;
pub const BASELINE_WINDOW_DAYS: i64 = 90;
/// Consumos positivos mínimos por ventana en el chequeo medio
pub const MEDIUM_WINDOW_MIN_SAMPLES: usize = 3;
const MEDIUM_WINDOW_MAX_RATIO: f64 = 0.85;

/// Caída de eficiencia detectada entre dos ventanas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Degradation {
    pub recent_average: f64,
    pub baseline_average: f64,
    /// Porcentaje de empeoramiento respecto de la línea base
    pub drop_percent: f64,
    pub recent_samples: usize,
    pub baseline_samples: usize,
}

impl Degradation {
    /// `Some` sólo si el promedio reciente cae por debajo de `baseline * max_ratio`
    fn detect(recent: &[f64], baseline_average: f64, baseline_samples: usize, max_ratio: f64) -> Option<Self> {
        let recent_average = mean(recent);
        if baseline_average <= 0.0 || recent_average >= baseline_average * max_ratio {
            return None;
        }
        Some(Self {
            recent_average,
            baseline_average,
            drop_percent: (baseline_average - recent_average) / baseline_average * 100.0,
            recent_samples: recent.len(),
            baseline_samples,
        })
    }

    fn metadata(&self) -> serde_json::Value {
        json!({
            "recent_average": round2(self.recent_average),
            "baseline_average": round2(self.baseline_average),
            "drop_percent": round2(self.drop_percent),
            "recent_samples": self.recent_samples,
            "baseline_samples": self.baseline_samples,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Chequeo de ventana corta.
///
/// La cola son los 3 abastecimientos más recientes más el anterior, para que
/// cada uno tenga su par. `records` debe venir ordenado por fecha.
pub fn short_window_check(records: &[FuelRecord]) -> Outcome<Option<Degradation>> {
    if records.len() < SHORT_WINDOW_MIN_RECORDS {
        return Outcome::InsufficientData(InsufficientReason::TooFewRecords);
    }

    let tail = &records[records.len() - (SHORT_WINDOW_FILLS + 1)..];
    let recent: Vec<f64> = fill_samples(tail)
        .into_iter()
        .filter_map(|s| s.consumption)
        .collect();
    if recent.is_empty() {
        return Outcome::InsufficientData(InsufficientReason::NoValidPairs);
    }

    consumption_stats(records).map(|historical| {
        Degradation::detect(&recent, historical.average, historical.samples, SHORT_WINDOW_MAX_RATIO)
    })
}

/// Chequeo de ventana media: `[hoy-30, hoy]` contra `[hoy-90, hoy-31]`
pub fn medium_window_check(records: &[FuelRecord], today: NaiveDate) -> Outcome<Option<Degradation>> {
    let recent_start = today - Duration::days(RECENT_WINDOW_DAYS);
    let baseline_start = today - Duration::days(BASELINE_WINDOW_DAYS);

    let mut recent = Vec::new();
    let mut baseline = Vec::new();
    for sample in fill_samples(records) {
        let Some(consumption) = sample.consumption.filter(|c| *c > 0.0) else {
            continue;
        };
        if sample.date >= recent_start && sample.date <= today {
            recent.push(consumption);
        } else if sample.date >= baseline_start && sample.date < recent_start {
            baseline.push(consumption);
        }
    }

    if recent.len() < MEDIUM_WINDOW_MIN_SAMPLES || baseline.len() < MEDIUM_WINDOW_MIN_SAMPLES {
        return Outcome::InsufficientData(InsufficientReason::TooFewRecords);
    }

    Outcome::Computed(Degradation::detect(
        &recent,
        mean(&baseline),
        baseline.len(),
        MEDIUM_WINDOW_MAX_RATIO,
    ))
}

pub fn fuel_anomaly_alert(vehicle: &Vehicle, degradation: &Degradation) -> AlertDraft {
    AlertDraft::new(
        AlertTarget::vehicle(vehicle.id, vehicle.owner_id),
        AlertType::FuelAnomaly,
        AlertSeverity::Warning,
        format!("Consumo anormal en {}", vehicle.display_name()),
        format!(
            "Los últimos abastecimientos promedian {:.1} km/l, un {:.0}% peor que el promedio histórico de {:.1} km/l.",
            degradation.recent_average, degradation.drop_percent, degradation.baseline_average
        ),
        degradation.metadata(),
    )
}

pub fn consumption_anomaly_alert(vehicle: &Vehicle, degradation: &Degradation) -> AlertDraft {
    AlertDraft::new(
        AlertTarget::vehicle(vehicle.id, vehicle.owner_id),
        AlertType::ConsumptionAnomaly,
        AlertSeverity::Warning,
        format!("Eficiencia en baja en {}", vehicle.display_name()),
        format!(
            "El consumo de los últimos {} días ({:.1} km/l) es un {:.0}% peor que el de los dos meses anteriores ({:.1} km/l).",
            RECENT_WINDOW_DAYS, degradation.recent_average, degradation.drop_percent, degradation.baseline_average
        ),
        degradation.metadata(),
    )
}

/// Ejecuta ambos chequeos y devuelve los borradores de las anomalías encontradas
pub fn detect_anomalies(vehicle: &Vehicle, records: &[FuelRecord], today: NaiveDate) -> Vec<AlertDraft> {
    let mut drafts = Vec::new();

    match short_window_check(records) {
        Outcome::Computed(Some(degradation)) => drafts.push(fuel_anomaly_alert(vehicle, &degradation)),
        Outcome::Computed(None) => {}
        Outcome::InsufficientData(reason) => {
            tracing::debug!(vehicle_id = %vehicle.id, reason = reason.as_str(), "Chequeo corto sin datos suficientes");
        }
        Outcome::Failed(reason) => {
            tracing::warn!(vehicle_id = %vehicle.id, "⚠️ Chequeo corto falló: {}", reason);
        }
    }

    match medium_window_check(records, today) {
        Outcome::Computed(Some(degradation)) => drafts.push(consumption_anomaly_alert(vehicle, &degradation)),
        Outcome::Computed(None) => {}
        Outcome::InsufficientData(reason) => {
            tracing::debug!(vehicle_id = %vehicle.id, reason = reason.as_str(), "Chequeo medio sin datos suficientes");
        }
        Outcome::Failed(reason) => {
            tracing::warn!(vehicle_id = %vehicle.id, "⚠️ Chequeo medio falló: {}", reason);
        }
    }

    drafts
}
