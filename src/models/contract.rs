//! Modelo de Contract
//!
//! Contrato de transporte con firma electrónica. Un contrato se crea al
//! enviar el formulario del portal y es inmutable salvo el borrado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contract - mapea exactamente a la tabla contracts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: Uuid,
    pub phone_number: String,
    pub lot_number: String,
    pub full_name: String,
    pub address: String,
    pub gatepass: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub signature_data: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}
