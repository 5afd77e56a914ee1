use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;

pub struct UserController {
    repository: UserRepository,
    driver_repository: DriverRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool.clone()),
            driver_repository: DriverRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        acting: &AuthenticatedUser,
        request: CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let role = UserRole::parse(&request.role)
            .ok_or_else(|| AppError::BadRequest("Rol inválido".to_string()))?;

        // Solo el admin principal puede crear otros administradores
        if role == UserRole::Admin && !acting.is_main_admin {
            return Err(AppError::Forbidden(
                "Solo el administrador principal puede crear administradores".to_string(),
            ));
        }

        if role == UserRole::Partner && request.partner_group.is_none() {
            return Err(AppError::BadRequest(
                "Un usuario partner requiere un grupo partner".to_string(),
            ));
        }

        if self.repository.username_exists(&request.username).await? {
            return Err(AppError::Conflict(
                "El nombre de usuario ya está registrado.".to_string(),
            ));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(request.username, password_hash, role, request.partner_group, false)
            .await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario creado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn update(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        if current.is_main_admin && !acting.is_main_admin {
            return Err(AppError::Forbidden(
                "Solo el administrador principal puede modificar su propia cuenta".to_string(),
            ));
        }

        if current.is_main_admin && request.is_active == Some(false) {
            return Err(AppError::Forbidden(
                "El administrador principal no puede desactivarse".to_string(),
            ));
        }

        let role = match &request.role {
            Some(value) => Some(
                UserRole::parse(value)
                    .ok_or_else(|| AppError::BadRequest("Rol inválido".to_string()))?,
            ),
            None => None,
        };

        if role == Some(UserRole::Admin) && !acting.is_main_admin {
            return Err(AppError::Forbidden(
                "Solo el administrador principal puede promover administradores".to_string(),
            ));
        }

        let password_hash = match &request.password {
            Some(password) => Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?,
            ),
            None => None,
        };

        let user = self
            .repository
            .update(id, password_hash, role, request.partner_group, request.is_active)
            .await?;

        Ok(ApiResponse::success_with_message(
            UserResponse::from(user),
            "Usuario actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, acting: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        if current.is_main_admin {
            return Err(AppError::Forbidden(
                "El administrador principal no puede eliminarse".to_string(),
            ));
        }

        if current.role == UserRole::Admin && !acting.is_main_admin {
            return Err(AppError::Forbidden(
                "Solo el administrador principal puede eliminar administradores".to_string(),
            ));
        }

        // Los usuarios de conductores se gestionan desde /api/drivers para
        // mantener el par User+Driver consistente
        if self.driver_repository.find_by_user_id(id).await?.is_some() {
            return Err(AppError::Conflict(
                "El usuario pertenece a un conductor; elimínelo desde la gestión de conductores"
                    .to_string(),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        Ok(())
    }
}
