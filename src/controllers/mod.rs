//! Controladores: orquestan repositorios y servicios para cada endpoint

pub mod alert_controller;
pub mod vehicle_controller;

pub use alert_controller::AlertController;
pub use vehicle_controller::VehicleController;
