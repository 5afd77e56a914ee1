//! Modelo de Driver
//!
//! Un conductor está ligado 1:1 a un usuario con rol `driver`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Driver - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub license_number: String,
    pub partner_group: Option<String>,
    pub created_at: DateTime<Utc>,
}
