//! Catálogo de estados del pipeline
//!
//! La tabla states guarda los cinco estados con su posición ordinal.
//! La usa el guard de transiciones y se expone de solo lectura.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// State - mapea exactamente a la tabla states
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct State {
    pub id: i16,
    pub name: String,
    pub position: i16,
}
