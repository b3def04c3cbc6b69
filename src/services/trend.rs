//! Tendencia de eficiencia
//!
//! Compara el promedio de los tres primeros consumos aceptados con el de los
//! tres últimos, con una banda fija de ±5%.

use serde::{Deserialize, Serialize};

use super::consumption::mean;

/// Mínimo de consumos aceptados para evaluar la tendencia
pub const MIN_TREND_SAMPLES: usize = 6;
const TREND_WINDOW: usize = 3;
const IMPROVING_FACTOR: f64 = 1.05;
const WORSENING_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyTrend {
    Improving,
    Stable,
    Worsening,
}

impl EfficiencyTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EfficiencyTrend::Improving => "improving",
            EfficiencyTrend::Stable => "stable",
            EfficiencyTrend::Worsening => "worsening",
        }
    }
}

/// Clasifica la secuencia cronológica de consumos aceptados
pub fn classify_trend(consumptions: &[f64]) -> EfficiencyTrend {
    if consumptions.len() < MIN_TREND_SAMPLES {
        return EfficiencyTrend::Stable;
    }

    let first = mean(&consumptions[..TREND_WINDOW]);
    let last = mean(&consumptions[consumptions.len() - TREND_WINDOW..]);

    if last > first * IMPROVING_FACTOR {
        EfficiencyTrend::Improving
    } else if last < first * WORSENING_FACTOR {
        EfficiencyTrend::Worsening
    } else {
        EfficiencyTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequences_are_stable() {
        assert_eq!(classify_trend(&[]), EfficiencyTrend::Stable);
        assert_eq!(classify_trend(&[5.0, 25.0, 5.0, 25.0, 5.0]), EfficiencyTrend::Stable);
        assert_eq!(classify_trend(&[25.0, 20.0, 15.0, 10.0, 5.0]), EfficiencyTrend::Stable);
    }

    #[test]
    fn test_improving() {
        let values = [10.0, 10.0, 10.0, 11.0, 11.0, 11.0];
        assert_eq!(classify_trend(&values), EfficiencyTrend::Improving);
    }

    #[test]
    fn test_worsening() {
        let values = [12.0, 12.0, 12.0, 12.0, 11.0, 11.0, 11.0];
        assert_eq!(classify_trend(&values), EfficiencyTrend::Worsening);
    }

    #[test]
    fn test_within_band_is_stable() {
        // +4% y -4%: dentro de la banda de histéresis
        assert_eq!(
            classify_trend(&[10.0, 10.0, 10.0, 10.4, 10.4, 10.4]),
            EfficiencyTrend::Stable
        );
        assert_eq!(
            classify_trend(&[10.0, 10.0, 10.0, 9.6, 9.6, 9.6]),
            EfficiencyTrend::Stable
        );
    }

    #[test]
    fn test_middle_values_are_ignored() {
        let values = [10.0, 10.0, 10.0, 3.0, 25.0, 3.0, 10.0, 10.0, 10.0];
        assert_eq!(classify_trend(&values), EfficiencyTrend::Stable);
    }
}
