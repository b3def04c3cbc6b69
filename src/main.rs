use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use fleet_health::config::{DatabaseConfig, EnvironmentConfig};
use fleet_health::database::DatabaseConnection;
use fleet_health::repositories::{
    AlertRepository, AlertStore, InMemoryStore, RecordStore, VehicleRepository,
};
use fleet_health::routes::create_router;
use fleet_health::services::{notifier, scheduler};
use fleet_health::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Fleet Health - consumo y alertas de mantenimiento");
    info!("===================================================");

    let (records, alerts) = open_stores().await?;
    let notifier = notifier::from_config(config.notify_webhook_url.as_deref())?;
    let state = AppState::new(config.clone(), records, alerts, notifier);

    // Chequeos periódicos
    let (stop_scheduler, stop_rx) = watch::channel(false);
    let scheduler_handle = scheduler::spawn_scheduler(
        state.runner.clone(),
        config.check_interval,
        config.run_checks_on_startup,
        stop_rx,
    );

    let app = create_router(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   POST /api/alerts/run-checks - Ejecutar chequeos ahora");
    info!("   GET  /api/alerts - Alertas activas");
    info!("   GET  /api/vehicles/:id/efficiency - Eficiencia del vehículo");
    info!("   GET  /api/vehicles/:id/maintenance - Estado de mantenimiento");
    info!("   GET  /api/owners/:owner_id/summary - Resumen de flota");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    stop_scheduler.send(true).ok();
    if let Err(e) = scheduler_handle.await {
        error!("❌ El scheduler terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// PostgreSQL si hay DATABASE_URL; si no, almacenamiento en memoria
async fn open_stores() -> Result<(Arc<dyn RecordStore>, Arc<dyn AlertStore>)> {
    if std::env::var("DATABASE_URL").is_err() {
        warn!("⚠️ DATABASE_URL no definida: usando almacenamiento en memoria");
        let store = Arc::new(InMemoryStore::new());
        let records: Arc<dyn RecordStore> = store.clone();
        let alerts: Arc<dyn AlertStore> = store;
        return Ok((records, alerts));
    }

    let db_connection = match DatabaseConnection::new(&DatabaseConfig::from_env()?).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    db_connection.run_migrations().await?;

    let pool = db_connection.pool().clone();
    let records: Arc<dyn RecordStore> = Arc::new(VehicleRepository::new(pool.clone()));
    let alerts: Arc<dyn AlertStore> = Arc::new(AlertRepository::new(pool));
    Ok((records, alerts))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
