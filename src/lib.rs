//! Fleet health
//!
//! Núcleo de análisis de consumo y alertas de mantenimiento para vehículos:
//! calcula la eficiencia a partir de los abastecimientos, proyecta los
//! vencimientos de mantenimiento y emite alertas deduplicadas en pasadas
//! periódicas o a pedido.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;
