//! Resumen de eficiencia por vehículo
//!
//! Combina las estadísticas de consumo con la tendencia y el gasto de los
//! últimos 30 días para la vista de detalle de un vehículo.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::consumption::{accepted_consumptions, ConsumptionStats};
use super::outcome::InsufficientReason;
use super::trend::{classify_trend, EfficiencyTrend};
use crate::models::FuelRecord;

/// Ventana del gasto reciente
pub const RECENT_EXPENSE_DAYS: i64 = 30;

/// Vista plana del consumo. Sin datos, todos los valores quedan en cero y
/// `has_data = false`; `reason` indica por qué.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencySummary {
    pub average: f64,
    pub best: f64,
    pub worst: f64,
    pub trend: EfficiencyTrend,
    pub has_data: bool,
    pub samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InsufficientReason>,
}

impl EfficiencySummary {
    fn empty(reason: InsufficientReason) -> Self {
        Self {
            average: 0.0,
            best: 0.0,
            worst: 0.0,
            trend: EfficiencyTrend::Stable,
            has_data: false,
            samples: 0,
            reason: Some(reason),
        }
    }
}

pub fn efficiency_summary(records: &[FuelRecord]) -> EfficiencySummary {
    if records.iter().filter(|r| r.odometer.is_some()).count() < 2 {
        return EfficiencySummary::empty(InsufficientReason::TooFewRecords);
    }

    let values = accepted_consumptions(records);
    match ConsumptionStats::from_values(&values) {
        Some(stats) => EfficiencySummary {
            average: stats.average,
            best: stats.best,
            worst: stats.worst,
            trend: classify_trend(&values),
            has_data: true,
            samples: stats.samples,
            reason: None,
        },
        None => EfficiencySummary::empty(InsufficientReason::NoValidPairs),
    }
}

/// Gasto de los abastecimientos con fecha en `[hoy-30, hoy]`
pub fn recent_expense(records: &[FuelRecord], today: NaiveDate) -> Decimal {
    let since = today - Duration::days(RECENT_EXPENSE_DAYS);
    records
        .iter()
        .filter(|r| r.date >= since && r.date <= today)
        .map(|r| r.total_cost)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, fuel};

    #[test]
    fn test_summary_without_data_is_zeroed() {
        let summary = efficiency_summary(&[fuel(1, Some(10_000.0), 40.0)]);
        assert!(!summary.has_data);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.trend, EfficiencyTrend::Stable);
        assert_eq!(summary.reason, Some(InsufficientReason::TooFewRecords));
    }

    #[test]
    fn test_summary_with_trend() {
        let mut records = vec![fuel(0, Some(10_000.0), 40.0)];
        let mut km = 10_000.0;
        for (i, step) in [400.0, 400.0, 400.0, 480.0, 480.0, 480.0].iter().enumerate() {
            km += step;
            records.push(fuel(i as u32 + 1, Some(km), 40.0));
        }

        let summary = efficiency_summary(&records);
        assert!(summary.has_data);
        assert_eq!(summary.samples, 6);
        assert_eq!(summary.best, 12.0);
        assert_eq!(summary.worst, 10.0);
        assert_eq!(summary.trend, EfficiencyTrend::Improving);
    }

    #[test]
    fn test_recent_expense_window() {
        let records = vec![
            fuel(0, Some(10_000.0), 10.0),
            fuel(50, Some(10_300.0), 10.0),
            fuel(70, Some(10_600.0), 20.0),
        ];
        // 6.00 por litro: sólo entran los días 50 y 70
        assert_eq!(recent_expense(&records, day(70)), Decimal::new(18_000, 2));
    }
}
