//! Modelos de dominio
//!
//! Structs que mapean exactamente al schema PostgreSQL.

pub mod client;
pub mod contract;
pub mod driver;
pub mod notification;
pub mod state;
pub mod user;
pub mod vehicle;
