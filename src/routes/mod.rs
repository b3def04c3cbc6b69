//! Rutas HTTP
//!
//! Superficie mínima: disparo manual de chequeos y vistas de sólo lectura.

pub mod alert_routes;
pub mod owner_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/alerts", alert_routes::create_alert_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/owners", owner_routes::create_owner_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet_health",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
