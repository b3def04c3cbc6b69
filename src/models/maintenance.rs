//! Modelo de mantenimiento
//!
//! Contiene el catálogo tipado de tipos de mantenimiento con sus intervalos y
//! umbrales (una sola tabla compartida por el proyector y por las reglas de
//! alertas) y el registro `MaintenanceRecord` que mapea la tabla
//! maintenance_records.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Días por mes usados en todas las proyecciones de calendario
pub const DAYS_PER_MONTH: i64 = 30;

/// Tipo de mantenimiento - mapea al ENUM maintenance_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "maintenance_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Oil,
    FilterAir,
    FilterFuel,
    FilterOil,
    Tires,
    Brakes,
    Battery,
    SparkPlugs,
    Transmission,
    Coolant,
    BrakeFluid,
    PowerSteering,
    Suspension,
    Alignment,
    Balancing,
    Other,
}

/// Intervalos y umbrales de un tipo de mantenimiento
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintenanceSchedule {
    pub distance_interval_km: Option<i32>,
    pub calendar_interval_months: Option<i32>,
    /// Distancia restante a partir de la cual el servicio está "próximo"
    pub due_soon_km: f64,
    /// Días restantes a partir de los cuales el servicio está "próximo"
    pub due_soon_days: i64,
    /// Anticipación del aviso sobre el intervalo de calendario
    pub warning_lead_days: i64,
    /// Tolerancia después del intervalo antes de pasar a crítico
    pub critical_lag_days: i64,
    /// Exceso de km sobre el próximo servicio que vuelve crítica la alerta
    pub critical_overdue_km: f64,
}

impl MaintenanceSchedule {
    const fn new(km: Option<i32>, months: Option<i32>, lead: i64, lag: i64) -> Self {
        Self {
            distance_interval_km: km,
            calendar_interval_months: months,
            due_soon_km: 500.0,
            due_soon_days: 30,
            warning_lead_days: lead,
            critical_lag_days: lag,
            critical_overdue_km: 2000.0,
        }
    }

    /// Intervalo de calendario expresado en días
    pub fn calendar_interval_days(&self) -> Option<i64> {
        self.calendar_interval_months
            .map(|months| i64::from(months) * DAYS_PER_MONTH)
    }
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 16] = [
        MaintenanceType::Oil,
        MaintenanceType::FilterAir,
        MaintenanceType::FilterFuel,
        MaintenanceType::FilterOil,
        MaintenanceType::Tires,
        MaintenanceType::Brakes,
        MaintenanceType::Battery,
        MaintenanceType::SparkPlugs,
        MaintenanceType::Transmission,
        MaintenanceType::Coolant,
        MaintenanceType::BrakeFluid,
        MaintenanceType::PowerSteering,
        MaintenanceType::Suspension,
        MaintenanceType::Alignment,
        MaintenanceType::Balancing,
        MaintenanceType::Other,
    ];

    /// Intervalos por defecto y umbrales de alerta del tipo
    pub fn schedule(self) -> MaintenanceSchedule {
        use MaintenanceType::*;
        match self {
            // El aceite usa umbrales propios: 300 km / 15 días
            Oil => MaintenanceSchedule {
                due_soon_km: 300.0,
                due_soon_days: 15,
                ..MaintenanceSchedule::new(Some(10_000), Some(6), 15, 30)
            },
            FilterOil => MaintenanceSchedule::new(Some(10_000), Some(6), 15, 30),
            FilterAir => MaintenanceSchedule::new(Some(15_000), Some(12), 30, 30),
            FilterFuel => MaintenanceSchedule::new(Some(20_000), Some(12), 30, 30),
            Tires => MaintenanceSchedule::new(Some(50_000), Some(48), 30, 60),
            Brakes => MaintenanceSchedule::new(Some(30_000), Some(24), 30, 60),
            Battery => MaintenanceSchedule::new(None, Some(36), 30, 60),
            SparkPlugs => MaintenanceSchedule::new(Some(30_000), Some(24), 30, 60),
            Transmission => MaintenanceSchedule::new(Some(60_000), Some(48), 30, 60),
            Coolant => MaintenanceSchedule::new(Some(40_000), Some(24), 30, 60),
            BrakeFluid => MaintenanceSchedule::new(None, Some(24), 30, 60),
            PowerSteering => MaintenanceSchedule::new(Some(50_000), Some(36), 30, 60),
            Suspension => MaintenanceSchedule::new(Some(80_000), Some(60), 30, 60),
            Alignment => MaintenanceSchedule::new(Some(20_000), Some(12), 30, 30),
            Balancing => MaintenanceSchedule::new(Some(15_000), Some(12), 30, 30),
            Other => MaintenanceSchedule::new(None, None, 30, 30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        use MaintenanceType::*;
        match self {
            Oil => "oil",
            FilterAir => "filter_air",
            FilterFuel => "filter_fuel",
            FilterOil => "filter_oil",
            Tires => "tires",
            Brakes => "brakes",
            Battery => "battery",
            SparkPlugs => "spark_plugs",
            Transmission => "transmission",
            Coolant => "coolant",
            BrakeFluid => "brake_fluid",
            PowerSteering => "power_steering",
            Suspension => "suspension",
            Alignment => "alignment",
            Balancing => "balancing",
            Other => "other",
        }
    }

    /// Nombre amigable para mensajes de alerta
    pub fn display_name(&self) -> &'static str {
        use MaintenanceType::*;
        match self {
            Oil => "Cambio de aceite",
            FilterAir => "Filtro de aire",
            FilterFuel => "Filtro de combustible",
            FilterOil => "Filtro de aceite",
            Tires => "Neumáticos",
            Brakes => "Frenos",
            Battery => "Batería",
            SparkPlugs => "Bujías",
            Transmission => "Transmisión",
            Coolant => "Líquido refrigerante",
            BrakeFluid => "Líquido de frenos",
            PowerSteering => "Dirección hidráulica",
            Suspension => "Suspensión",
            Alignment => "Alineación",
            Balancing => "Balanceo",
            Other => "Otro",
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MaintenanceType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown maintenance type: {}", s))
    }
}

/// Registro de mantenimiento - mapea la tabla maintenance_records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub date: NaiveDate,
    pub description: String,
    pub cost: Option<Decimal>,
    pub km_at_service: Option<i32>,
    pub service_interval_km: Option<i32>,
    pub service_interval_months: Option<i32>,
    /// Derivado por el núcleo
    pub next_service_km: Option<i32>,
    /// Derivado por el núcleo
    pub next_service_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    pub fn schedule(&self) -> MaintenanceSchedule {
        self.maintenance_type.schedule()
    }

    /// Intervalo en km declarado; si falta, el del catálogo
    pub fn effective_interval_km(&self) -> Option<i32> {
        self.service_interval_km
            .or(self.schedule().distance_interval_km)
            .filter(|km| *km > 0)
    }

    /// Intervalo en meses declarado; si falta, el del catálogo
    pub fn effective_interval_months(&self) -> Option<i32> {
        self.service_interval_months
            .or(self.schedule().calendar_interval_months)
            .filter(|months| *months > 0)
    }

    /// Km del próximo servicio: km del servicio + intervalo
    pub fn next_due_km(&self) -> Option<i32> {
        let km_at_service = self.km_at_service?;
        let interval = self.effective_interval_km()?;
        km_at_service.checked_add(interval)
    }

    /// Fecha del próximo servicio: fecha + meses * 30 días
    pub fn next_due_date(&self) -> Option<NaiveDate> {
        let months = self.effective_interval_months()?;
        self.date
            .checked_add_signed(Duration::days(i64::from(months) * DAYS_PER_MONTH))
    }
}
