//! Despacho de notificaciones
//!
//! Capacidad inyectada en el runner. Un error al notificar nunca revierte la
//! alerta ya creada: el emisor sólo lo registra en el log.

use async_trait::async_trait;
use std::time::Duration;

use crate::models::Alert;
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> AppResult<()>;
}

/// Notificaciones desactivadas (entornos sin integración externa)
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, _alert: &Alert) -> AppResult<()> {
        Ok(())
    }
}

/// Envía cada alerta creada como JSON a un webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &Alert) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .header("User-Agent", "FleetHealth/1.0")
            .json(alert)
            .send()
            .await
            .map_err(|e| AppError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!("webhook returned {}: {}", status, body)));
        }

        tracing::debug!(alert_id = %alert.id, "📨 Notificación enviada");
        Ok(())
    }
}

/// Notificador según configuración: webhook si hay URL, desactivado si no
pub fn from_config(webhook_url: Option<&str>) -> AppResult<std::sync::Arc<dyn Notifier>> {
    match webhook_url {
        Some(url) if !url.trim().is_empty() => {
            tracing::info!("📨 Notificaciones por webhook activadas");
            Ok(std::sync::Arc::new(WebhookNotifier::new(url.trim())?))
        }
        _ => {
            tracing::info!("🔕 Notificaciones desactivadas");
            Ok(std::sync::Arc::new(DisabledNotifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_accepts_missing_url() {
        assert!(from_config(None).is_ok());
        assert!(from_config(Some("  ")).is_ok());
        assert!(from_config(Some("http://localhost:9000/hooks/alerts")).is_ok());
    }
}
