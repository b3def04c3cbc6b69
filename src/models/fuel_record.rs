//! Modelo de FuelRecord (abastecimiento)
//!
//! Los registros son inmutables para el núcleo. El odómetro puede faltar o
//! no ser monótono: los cálculos lo toleran pero no confían en él.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    /// Lectura acumulada del odómetro en km
    pub odometer: Option<f64>,
    pub liters: f64,
    pub total_cost: Decimal,
    pub price_per_liter: Option<Decimal>,
    pub gas_station: Option<String>,
    pub fuel_type: String,
    pub created_at: DateTime<Utc>,
}

impl FuelRecord {
    /// Precio por litro; se deriva del costo total si no fue informado
    pub fn unit_price(&self) -> Option<Decimal> {
        if self.price_per_liter.is_some() {
            return self.price_per_liter;
        }
        if self.liters <= 0.0 {
            return None;
        }
        let liters = Decimal::from_f64_retain(self.liters)?;
        self.total_cost.checked_div(liters).map(|p| p.round_dp(3))
    }
}
