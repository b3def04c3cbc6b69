//! Emisor de alertas con deduplicación por (vehículo, tipo)
//!
//! Antes de insertar busca una alerta activa del mismo par creada dentro de
//! la ventana de enfriamiento. Es un chequeo sin bloqueo: dos ejecuciones
//! superpuestas pueden duplicar una alerta, nunca corromperla.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::notifier::Notifier;
use crate::models::{Alert, AlertDraft};
use crate::repositories::AlertStore;
use crate::utils::errors::AppResult;

/// Resultado de una emisión
#[derive(Debug, Clone)]
pub enum EmitOutcome {
    Created(Alert),
    /// Ya existía una alerta dentro de la ventana de enfriamiento
    Suppressed { existing_id: Uuid },
}

impl EmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, EmitOutcome::Created(_))
    }
}

#[derive(Clone)]
pub struct AlertEmitter {
    alerts: Arc<dyn AlertStore>,
    notifier: Arc<dyn Notifier>,
}

impl AlertEmitter {
    pub fn new(alerts: Arc<dyn AlertStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { alerts, notifier }
    }

    /// Emite el borrador salvo que ya exista una alerta reciente del mismo par.
    ///
    /// Un error del store se propaga (la alerta no se creó); un error del
    /// notificador sólo se registra.
    pub async fn emit(&self, draft: AlertDraft, now: DateTime<Utc>) -> AppResult<EmitOutcome> {
        let created_after = draft.cooldown.window_start(now);
        if let Some(existing) = self
            .alerts
            .find_alert(draft.target.vehicle_id, draft.alert_type, created_after)
            .await?
        {
            tracing::debug!(
                vehicle_id = ?draft.target.vehicle_id,
                alert_type = %draft.alert_type,
                existing_id = %existing.id,
                "Alerta suprimida por enfriamiento"
            );
            return Ok(EmitOutcome::Suppressed {
                existing_id: existing.id,
            });
        }

        let created = self.alerts.create_alert(&draft.into_alert(now)).await?;
        tracing::info!(
            vehicle_id = ?created.vehicle_id,
            alert_type = %created.alert_type,
            severity = created.severity.as_str(),
            "🚨 Alerta creada: {}",
            created.title
        );

        if let Err(e) = self.notifier.notify(&created).await {
            tracing::warn!(alert_id = %created.id, "⚠️ No se pudo notificar la alerta: {}", e);
        }

        Ok(EmitOutcome::Created(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertSeverity, AlertTarget, AlertType, Cooldown};
    use crate::repositories::InMemoryStore;
    use crate::services::notifier::DisabledNotifier;
    use crate::utils::errors::AppError;
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _alert: &Alert) -> AppResult<()> {
            Err(AppError::Notification("smtp down".to_string()))
        }
    }

    fn draft(vehicle_id: Uuid, alert_type: AlertType) -> AlertDraft {
        AlertDraft::new(
            AlertTarget::vehicle(vehicle_id, Uuid::new_v4()),
            alert_type,
            AlertSeverity::Warning,
            "Título",
            "Mensaje",
            json!({}),
        )
    }

    fn emitter(store: &InMemoryStore, notifier: Arc<dyn Notifier>) -> AlertEmitter {
        AlertEmitter::new(Arc::new(store.clone()), notifier)
    }

    #[tokio::test]
    async fn test_second_emit_within_cooldown_is_suppressed() {
        let store = InMemoryStore::new();
        let emitter = emitter(&store, Arc::new(DisabledNotifier));
        let vehicle_id = Uuid::new_v4();
        let now = Utc::now();

        let first = emitter.emit(draft(vehicle_id, AlertType::FuelAnomaly), now).await.unwrap();
        let second = emitter
            .emit(draft(vehicle_id, AlertType::FuelAnomaly), now + Duration::days(3))
            .await
            .unwrap();

        assert!(first.is_created());
        assert!(matches!(second, EmitOutcome::Suppressed { .. }));
        assert_eq!(store.alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_emit_after_cooldown_creates_again() {
        let store = InMemoryStore::new();
        let emitter = emitter(&store, Arc::new(DisabledNotifier));
        let vehicle_id = Uuid::new_v4();
        let now = Utc::now();

        emitter.emit(draft(vehicle_id, AlertType::FuelAnomaly), now).await.unwrap();
        let later = emitter
            .emit(draft(vehicle_id, AlertType::FuelAnomaly), now + Duration::days(8))
            .await
            .unwrap();

        assert!(later.is_created());
        assert_eq!(store.alerts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_dedup_is_per_vehicle_and_type() {
        let store = InMemoryStore::new();
        let emitter = emitter(&store, Arc::new(DisabledNotifier));
        let now = Utc::now();
        let vehicle_id = Uuid::new_v4();

        emitter.emit(draft(vehicle_id, AlertType::FuelAnomaly), now).await.unwrap();
        let other_type = emitter.emit(draft(vehicle_id, AlertType::ConsumptionAnomaly), now).await.unwrap();
        let other_vehicle = emitter.emit(draft(Uuid::new_v4(), AlertType::FuelAnomaly), now).await.unwrap();

        assert!(other_type.is_created());
        assert!(other_vehicle.is_created());
        assert_eq!(store.alerts().await.len(), 3);
    }

    #[tokio::test]
    async fn test_forever_cooldown_never_repeats() {
        let store = InMemoryStore::new();
        let emitter = emitter(&store, Arc::new(DisabledNotifier));
        let vehicle_id = Uuid::new_v4();
        let now = Utc::now();

        let once = draft(vehicle_id, AlertType::MaintenanceDue).with_cooldown(Cooldown::Forever);
        emitter.emit(once.clone(), now).await.unwrap();
        let again = emitter.emit(once, now + Duration::days(400)).await.unwrap();

        assert!(!again.is_created());
        assert_eq!(store.alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_failure_keeps_alert() {
        let store = InMemoryStore::new();
        let emitter = emitter(&store, Arc::new(FailingNotifier));

        let outcome = emitter
            .emit(draft(Uuid::new_v4(), AlertType::VehicleAge), Utc::now())
            .await
            .unwrap();

        assert!(outcome.is_created());
        assert_eq!(store.alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let store = InMemoryStore::new();
        store.set_fail_alert_writes(true).await;
        let emitter = emitter(&store, Arc::new(DisabledNotifier));

        let result = emitter.emit(draft(Uuid::new_v4(), AlertType::VehicleAge), Utc::now()).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(store.alerts().await.is_empty());
    }
}
