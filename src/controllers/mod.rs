//! Controllers: validación, reglas de negocio y mapeo a DTOs

pub mod auth_controller;
pub mod client_controller;
pub mod contract_controller;
pub mod driver_controller;
pub mod notification_controller;
pub mod state_controller;
pub mod user_controller;
pub mod vehicle_controller;
