//! Modelo de Vehicle
//!
//! Mapea la tabla vehicles. El núcleo nunca borra vehículos: sólo
//! considera los que tienen `is_active = true`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Año del modelo
    pub year: i32,
    pub license_plate: Option<String>,
    pub fuel_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Antigüedad del vehículo en años respecto al año indicado
    pub fn age_in_years(&self, current_year: i32) -> i32 {
        current_year - self.year
    }

    /// Nombre corto para títulos de alertas
    pub fn display_name(&self) -> String {
        match &self.license_plate {
            Some(plate) if !plate.is_empty() => format!("{} ({})", self.name, plate),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(year: i32, plate: Option<&str>) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Gol".to_string(),
            brand: Some("VW".to_string()),
            model: Some("Gol 1.0".to_string()),
            year,
            license_plate: plate.map(str::to_string),
            fuel_type: "gasoline".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_age_in_years() {
        assert_eq!(vehicle(2014, None).age_in_years(2026), 12);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(vehicle(2020, Some("ABC1D23")).display_name(), "Gol (ABC1D23)");
        assert_eq!(vehicle(2020, Some("")).display_name(), "Gol");
        assert_eq!(vehicle(2020, None).display_name(), "Gol");
    }
}
