//! Acceso a datos con SQLx

pub mod client_repository;
pub mod contract_repository;
pub mod driver_repository;
pub mod notification_repository;
pub mod state_repository;
pub mod user_repository;
pub mod vehicle_repository;
