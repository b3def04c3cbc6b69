//! Resultado etiquetado de los cálculos
//!
//! La falta de datos es un resultado normal: nunca se representa con un cero
//! ni con un error.

use serde::Serialize;

/// Motivo por el que un cálculo no pudo producir un valor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    /// Menos registros que los requeridos
    TooFewRecords,
    /// Ningún par de abastecimientos pasó los filtros
    NoValidPairs,
    /// El mantenimiento no registra el km del servicio
    MissingServiceOdometer,
    /// El mantenimiento no tiene intervalo declarado ni por catálogo
    MissingInterval,
    /// No hay ninguna lectura de odómetro para el vehículo
    NoOdometerReading,
    /// La ventana de uso no tiene tiempo ni distancia positivos
    NonPositiveWindow,
    /// El servicio ya está vencido: no hay nada que proyectar
    AlreadyDue,
}

impl InsufficientReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsufficientReason::TooFewRecords => "too_few_records",
            InsufficientReason::NoValidPairs => "no_valid_pairs",
            InsufficientReason::MissingServiceOdometer => "missing_service_odometer",
            InsufficientReason::MissingInterval => "missing_interval",
            InsufficientReason::NoOdometerReading => "no_odometer_reading",
            InsufficientReason::NonPositiveWindow => "non_positive_window",
            InsufficientReason::AlreadyDue => "already_due",
        }
    }
}

/// `Computed(valor)` / `InsufficientData(motivo)` / `Failed(motivo)`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Computed(T),
    InsufficientData(InsufficientReason),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn computed(&self) -> Option<&T> {
        match self {
            Outcome::Computed(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_computed(self) -> Option<T> {
        match self {
            Outcome::Computed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Outcome::Computed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Computed(value) => Outcome::Computed(f(value)),
            Outcome::InsufficientData(reason) => Outcome::InsufficientData(reason),
            Outcome::Failed(reason) => Outcome::Failed(reason),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Computed(value) => f(value),
            Outcome::InsufficientData(reason) => Outcome::InsufficientData(reason),
            Outcome::Failed(reason) => Outcome::Failed(reason),
        }
    }
}
