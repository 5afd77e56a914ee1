//! Servicio de conductores
//!
//! Un conductor existe siempre en pareja con su usuario. Las escrituras
//! User+Driver van dentro de una transacción: si la segunda inserción
//! falla, el abort no deja un usuario huérfano.

use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::models::driver::Driver;
use crate::models::user::{User, UserRole};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::user_repository::DUPLICATE_USERNAME_MESSAGE;
use crate::utils::errors::AppError;

pub struct DriverService {
    pool: PgPool,
}

impl DriverService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear el usuario (rol driver) y el conductor en una sola transacción
    pub async fn create_driver(
        &self,
        request: CreateDriverRequest,
    ) -> Result<DriverResponse, AppError> {
        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (id, username, password_hash, role, partner_group, is_active, is_main_admin, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, FALSE, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.username)
        .bind(password_hash)
        .bind(UserRole::Driver)
        .bind(&request.partner_group)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_USERNAME_MESSAGE))?;

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, user_id, name, phone, license_number, partner_group, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&request.name)
        .bind(&request.phone)
        .bind(&request.license_number)
        .bind(&request.partner_group)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Conductor creado: {} (usuario {})", driver.id, user.username);
        Ok(DriverResponse::from_parts(driver, user.username))
    }

    /// Actualizar el par User+Driver en una sola transacción
    pub async fn update_driver(
        &self,
        id: Uuid,
        request: UpdateDriverRequest,
    ) -> Result<DriverResponse, AppError> {
        let current = DriverRepository::new(self.pool.clone())
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let password_hash = match &request.password {
            Some(password) => Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?,
            ),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let partner_group = request.partner_group.clone().or(current.partner_group);

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = COALESCE($2, password_hash),
                partner_group = $3,
                is_active = COALESCE($4, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.user_id)
        .bind(password_hash)
        .bind(&partner_group)
        .bind(request.is_active)
        .fetch_one(&mut *tx)
        .await?;

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $2, phone = $3, license_number = $4, partner_group = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.unwrap_or(current.name))
        .bind(request.phone.unwrap_or(current.phone))
        .bind(request.license_number.unwrap_or(current.license_number))
        .bind(&partner_group)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DriverResponse::from_parts(driver, user.username))
    }

    /// Borrar el conductor y su usuario en una sola transacción.
    /// Se rechaza si todavía tiene vehículos asignados.
    pub async fn delete_driver(&self, id: Uuid) -> Result<(), AppError> {
        let repository = DriverRepository::new(self.pool.clone());
        let current = repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        if repository.has_vehicles(id).await? {
            return Err(AppError::Conflict(
                "El conductor tiene vehículos asignados y no puede eliminarse".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(current.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
