//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{AlertStore, RecordStore};
use crate::services::notifier::Notifier;
use crate::services::BatchRunner;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub records: Arc<dyn RecordStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub runner: BatchRunner,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        records: Arc<dyn RecordStore>,
        alerts: Arc<dyn AlertStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let runner = BatchRunner::new(records.clone(), alerts.clone(), notifier);
        Self {
            config,
            records,
            alerts,
            runner,
        }
    }
}
