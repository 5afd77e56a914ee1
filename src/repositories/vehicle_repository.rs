use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleComment, VehicleStatus};
use crate::utils::errors::AppError;

/// Mensaje de usuario para el lote de vehículo duplicado
pub const DUPLICATE_VEHICLE_LOT_MESSAGE: &str =
    "Este número de lote ya ha sido registrado. Verifique el número e intente nuevamente.";

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        driver_id: Option<Uuid>,
        brand: String,
        model: String,
        year: i32,
        lot: String,
        status: VehicleStatus,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles
                (id, client_id, driver_id, brand, model, year, lot, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(driver_id)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(lot)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_VEHICLE_LOT_MESSAGE))?;

        Ok(vehicle)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    /// Vehículos visibles para un grupo partner: los asignados a
    /// conductores de ese grupo
    pub async fn find_by_partner_group(
        &self,
        partner_group: &str,
    ) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.*
            FROM vehicles v
            JOIN drivers d ON d.id = v.driver_id
            WHERE d.partner_group = $1
            ORDER BY v.created_at DESC
            "#,
        )
        .bind(partner_group)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Vehículos asignados al conductor de un usuario
    pub async fn find_by_driver_user(&self, user_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.*
            FROM vehicles v
            JOIN drivers d ON d.id = v.driver_id
            WHERE d.user_id = $1
            ORDER BY v.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn update(
        &self,
        id: Uuid,
        client_id: Option<Uuid>,
        driver_id: Option<Uuid>,
        brand: Option<String>,
        model: Option<String>,
        year: Option<i32>,
        status: Option<VehicleStatus>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET client_id = $2, driver_id = $3, brand = $4, model = $5, year = $6, status = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id.unwrap_or(current.client_id))
        .bind(driver_id.or(current.driver_id))
        .bind(brand.unwrap_or(current.brand))
        .bind(model.unwrap_or(current.model))
        .bind(year.unwrap_or(current.year))
        .bind(status.unwrap_or(current.status))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Guardar la URL de una foto de carga en la ranura indicada (1..=4)
    pub async fn set_photo_slot(
        &self,
        id: Uuid,
        slot: u8,
        url: String,
    ) -> Result<Vehicle, AppError> {
        let column = match slot {
            1 => "photo_slot_1",
            2 => "photo_slot_2",
            3 => "photo_slot_3",
            4 => "photo_slot_4",
            _ => {
                return Err(AppError::BadRequest(
                    "La ranura de foto debe estar entre 1 y 4".to_string(),
                ))
            }
        };

        let query = format!("UPDATE vehicles SET {} = $2 WHERE id = $1 RETURNING *", column);
        let vehicle = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(url)
            .fetch_one(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn add_comment(
        &self,
        vehicle_id: Uuid,
        author_id: Uuid,
        comment: String,
    ) -> Result<VehicleComment, AppError> {
        let comment = sqlx::query_as::<_, VehicleComment>(
            r#"
            INSERT INTO vehicle_comments (id, vehicle_id, author_id, comment, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(author_id)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn find_comments(&self, vehicle_id: Uuid) -> Result<Vec<VehicleComment>, AppError> {
        let comments = sqlx::query_as::<_, VehicleComment>(
            "SELECT * FROM vehicle_comments WHERE vehicle_id = $1 ORDER BY created_at ASC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
