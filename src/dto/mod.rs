//! Objetos de request/response de la API

pub mod alert_dto;
pub mod api_response;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
