//! Services module
//!
//! Lógica de negocio: cálculo de consumo y tendencia, proyección de
//! mantenimiento, detección de anomalías y emisión periódica de alertas.

pub mod alert_emitter;
pub mod alert_rules;
pub mod anomaly_detector;
pub mod batch_runner;
pub mod consumption;
pub mod efficiency;
pub mod fleet_summary;
pub mod maintenance_projector;
pub mod notifier;
pub mod outcome;
pub mod scheduler;
pub mod trend;

pub use alert_emitter::{AlertEmitter, EmitOutcome};
pub use batch_runner::{BatchRunner, RunSummary};
pub use notifier::{DisabledNotifier, Notifier, WebhookNotifier};
pub use outcome::{InsufficientReason, Outcome};
