use bcrypt::verify;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::user_dto::UserResponse;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            config,
        }
    }

    /// Login: verifica credenciales y emite el JWT
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let password_ok = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !password_ok {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("Usuario inactivo o suspendido".to_string()));
        }

        let jwt_config = JwtConfig::from(&self.config);
        let token = generate_token(
            user.id,
            &user.username,
            &user.role,
            user.partner_group.clone(),
            user.is_main_admin,
            &jwt_config,
        )?;

        let expires_at = Utc::now() + Duration::seconds(jwt_config.expiration as i64);

        tracing::info!("Login exitoso: {}", user.username);

        Ok(LoginResponse {
            token,
            expires_at,
            user: UserResponse::from(user),
        })
    }
}
