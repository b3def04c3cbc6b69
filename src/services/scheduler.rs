//! Ejecución periódica de los chequeos
//!
//! Los ticks que llegan mientras una pasada sigue corriendo se descartan
//! (`MissedTickBehavior::Skip`). Una ejecución manual puede superponerse con
//! la programada: el enfriamiento del emisor es el único resguardo.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::batch_runner::BatchRunner;

/// Lanza la tarea periódica. Termina cuando `shutdown` pasa a `true`.
pub fn spawn_scheduler(
    runner: BatchRunner,
    every: Duration,
    run_on_startup: bool,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // el primer tick de `interval` es inmediato
        if !run_on_startup {
            ticker.tick().await;
        }

        tracing::info!("⏰ Chequeos programados cada {} horas", every.as_secs_f64() / 3600.0);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match runner.run_checks().await {
                        Ok(summary) => {
                            tracing::info!("📋 Chequeo programado: {} alertas creadas", summary.alerts_created);
                        }
                        Err(e) => {
                            tracing::error!("❌ Chequeo programado falló: {}", e);
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("🛑 Scheduler detenido");
                        break;
                    }
                }
            }
        }
    })
}
