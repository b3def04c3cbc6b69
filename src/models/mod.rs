//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean
//! al schema PostgreSQL (ver migrations/).

pub mod alert;
pub mod fuel_record;
pub mod maintenance;
pub mod vehicle;

pub use alert::{Alert, AlertDraft, AlertSeverity, AlertTarget, AlertType, Cooldown};
pub use fuel_record::FuelRecord;
pub use maintenance::{MaintenanceRecord, MaintenanceSchedule, MaintenanceType};
pub use vehicle::Vehicle;
