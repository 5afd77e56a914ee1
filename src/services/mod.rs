//! Servicios de negocio

pub mod driver_service;
pub mod media_service;
pub mod stream_service;
