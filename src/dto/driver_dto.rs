//! DTOs de conductores
//!
//! La creación de un conductor también crea su usuario asociado, por lo
//! que el request lleva credenciales además de los datos del conductor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::Driver;

/// Request para crear un conductor junto con su usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 2, max = 150))]
    pub name: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone: String,

    #[validate(length(min = 3, max = 50))]
    pub license_number: String,

    #[validate(length(min = 2, max = 50))]
    pub partner_group: Option<String>,
}

/// Request para actualizar un conductor (y opcionalmente su contraseña)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    #[validate(length(min = 2, max = 150))]
    pub name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub license_number: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub partner_group: Option<String>,

    pub is_active: Option<bool>,
}

/// Response de conductor para la API
#[derive(Debug, Clone, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub phone: String,
    pub license_number: String,
    pub partner_group: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DriverResponse {
    pub fn from_parts(driver: Driver, username: String) -> Self {
        Self {
            id: driver.id,
            user_id: driver.user_id,
            username,
            name: driver.name,
            phone: driver.phone,
            license_number: driver.license_number,
            partner_group: driver.partner_group,
            created_at: driver.created_at,
        }
    }
}
