//! DTOs de usuarios

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, UserRole};

/// Request para crear un nuevo usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    /// admin | driver | partner
    pub role: String,

    #[validate(length(min = 2, max = 50))]
    pub partner_group: Option<String>,
}

/// Request para actualizar un usuario existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    pub role: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub partner_group: Option<String>,

    pub is_active: Option<bool>,
}

/// Response de usuario para la API (sin hash de contraseña)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub partner_group: Option<String>,
    pub is_active: bool,
    pub is_main_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            partner_group: user.partner_group,
            is_active: user.is_active,
            is_main_admin: user.is_main_admin,
            created_at: user.created_at,
        }
    }
}
