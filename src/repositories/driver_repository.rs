use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::utils::errors::AppError;

/// Fila de conductor con el username de su usuario asociado
#[derive(Debug, sqlx::FromRow)]
pub struct DriverWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub phone: String,
    pub license_number: String,
    pub partner_group: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<DriverWithUser>, AppError> {
        let drivers = sqlx::query_as::<_, DriverWithUser>(
            r#"
            SELECT d.id, d.user_id, u.username, d.name, d.phone,
                   d.license_number, d.partner_group, d.created_at
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            ORDER BY d.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn find_by_partner_group(
        &self,
        partner_group: &str,
    ) -> Result<Vec<DriverWithUser>, AppError> {
        let drivers = sqlx::query_as::<_, DriverWithUser>(
            r#"
            SELECT d.id, d.user_id, u.username, d.name, d.phone,
                   d.license_number, d.partner_group, d.created_at
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            WHERE d.partner_group = $1
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(partner_group)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DriverWithUser>, AppError> {
        let driver = sqlx::query_as::<_, DriverWithUser>(
            r#"
            SELECT d.id, d.user_id, u.username, d.name, d.phone,
                   d.license_number, d.partner_group, d.created_at
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    pub async fn has_vehicles(&self, id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE driver_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }
}
