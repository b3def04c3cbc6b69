//! Cálculo de consumo (km por litro)
//!
//! Implementación única del filtro de pares de abastecimientos. La usan el
//! resumen por vehículo, el dashboard de flota y el detector de anomalías.

use chrono::NaiveDate;
use serde::Serialize;

use super::outcome::{InsufficientReason, Outcome};
use crate::models::FuelRecord;

/// Distancia máxima aceptada entre dos abastecimientos (correcciones masivas de odómetro)
pub const MAX_PAIR_DISTANCE_KM: f64 = 2000.0;
/// Rango plausible de consumo en km/l
pub const MIN_CONSUMPTION_KM_L: f64 = 3.0;
pub const MAX_CONSUMPTION_KM_L: f64 = 25.0;

/// Par de abastecimientos consecutivos que pasó el filtro de distancia
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillSample {
    /// Fecha del abastecimiento que cierra el par
    pub date: NaiveDate,
    pub distance_km: f64,
    /// `None` si los litros no eran positivos o el consumo quedó fuera de rango
    pub consumption: Option<f64>,
}

/// Recorre los pares (i-1, i) de registros con odómetro y devuelve los que
/// cumplen `0 < distancia <= 2000`. El consumo del par sólo se acepta si
/// `liters[i] > 0` y `3 <= distancia / liters[i] <= 25`.
///
/// `records` debe venir ordenado por fecha.
pub fn fill_samples(records: &[FuelRecord]) -> Vec<FillSample> {
    let with_odometer: Vec<(&FuelRecord, f64)> = records
        .iter()
        .filter_map(|r| r.odometer.map(|km| (r, km)))
        .collect();

    with_odometer
        .windows(2)
        .filter_map(|pair| {
            let (_, prev_km) = pair[0];
            let (current, current_km) = pair[1];
            let distance = current_km - prev_km;
            if !(distance > 0.0 && distance <= MAX_PAIR_DISTANCE_KM) {
                return None;
            }

            let consumption = if current.liters > 0.0 {
                Some(distance / current.liters)
                    .filter(|c| (MIN_CONSUMPTION_KM_L..=MAX_CONSUMPTION_KM_L).contains(c))
            } else {
                None
            };

            Some(FillSample {
                date: current.date,
                distance_km: distance,
                consumption,
            })
        })
        .collect()
}

/// Secuencia cronológica de consumos aceptados
pub fn accepted_consumptions(records: &[FuelRecord]) -> Vec<f64> {
    fill_samples(records)
        .into_iter()
        .filter_map(|s| s.consumption)
        .collect()
}

/// Promedio, mejor y peor consumo
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionStats {
    pub average: f64,
    pub best: f64,
    pub worst: f64,
    pub samples: usize,
}

impl ConsumptionStats {
    /// Estadísticas de una secuencia ya filtrada
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let best = values.iter().copied().fold(f64::MIN, f64::max);
        let worst = values.iter().copied().fold(f64::MAX, f64::min);
        Some(Self {
            average: mean(values),
            best,
            worst,
            samples: values.len(),
        })
    }
}

/// Estadísticas de consumo de un vehículo
pub fn consumption_stats(records: &[FuelRecord]) -> Outcome<ConsumptionStats> {
    if records.iter().filter(|r| r.odometer.is_some()).count() < 2 {
        return Outcome::InsufficientData(InsufficientReason::TooFewRecords);
    }
    match ConsumptionStats::from_values(&accepted_consumptions(records)) {
        Some(stats) => Outcome::Computed(stats),
        None => Outcome::InsufficientData(InsufficientReason::NoValidPairs),
    }
}

/// Promedio aritmético; 0 para una secuencia vacía
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
