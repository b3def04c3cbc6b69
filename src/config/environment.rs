//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor HTTP,
//! planificación de las revisiones periódicas y notificaciones.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,
    /// Intervalo entre dos pasadas del batch de alertas
    pub check_interval: Duration,
    /// Ejecutar una pasada apenas arranca el servidor
    pub run_checks_on_startup: bool,
    /// Webhook para notificar alertas creadas (None = notificaciones desactivadas)
    pub notify_webhook_url: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: tracing::Level::INFO,
            cors_origins: Vec::new(),
            check_interval: Duration::from_secs(24 * 3600),
            run_checks_on_startup: false,
            notify_webhook_url: None,
        }
    }
}

impl EnvironmentConfig {
    /// Construir la configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let check_interval = check_interval_from_hours(parse_var("CHECK_INTERVAL_HOURS", 24)?)?;

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            check_interval,
            run_checks_on_startup: parse_var("RUN_CHECKS_ON_STARTUP", false)?,
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Intervalo del batch: mayor que cero y representable en segundos
fn check_interval_from_hours(hours: u64) -> AppResult<Duration> {
    if hours == 0 {
        return Err(AppError::Configuration(
            "CHECK_INTERVAL_HOURS must be greater than zero".to_string(),
        ));
    }
    hours
        .checked_mul(3600)
        .map(Duration::from_secs)
        .ok_or_else(|| AppError::Configuration(format!("CHECK_INTERVAL_HOURS is too large: {}", hours)))
}

/// Leer y parsear una variable de entorno opcional
fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::Configuration(format!("{} has an invalid value: '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
