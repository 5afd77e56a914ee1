use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::contract::Contract;
use crate::utils::errors::AppError;

/// Mensaje de usuario para el lote duplicado
pub const DUPLICATE_LOT_MESSAGE: &str =
    "Este número de lote ya ha sido registrado. Verifique el número e intente nuevamente.";

pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        phone_number: String,
        lot_number: String,
        full_name: String,
        address: String,
        gatepass: Option<String>,
        owner_name: Option<String>,
        owner_phone: Option<String>,
        signature_data: String,
        ip_address: Option<String>,
    ) -> Result<Contract, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts
                (id, phone_number, lot_number, full_name, address, gatepass,
                 owner_name, owner_phone, signature_data, ip_address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone_number)
        .bind(lot_number)
        .bind(full_name)
        .bind(address)
        .bind(gatepass)
        .bind(owner_name)
        .bind(owner_phone)
        .bind(signature_data)
        .bind(ip_address)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        // El índice único sobre lot_number es la última línea de defensa
        // contra la carrera entre el pre-chequeo y el INSERT
        .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_LOT_MESSAGE))?;

        Ok(contract)
    }

    pub async fn find_all(&self) -> Result<Vec<Contract>, AppError> {
        let contracts = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contract)
    }

    pub async fn find_by_phone(&self, phone_number: &str) -> Result<Vec<Contract>, AppError> {
        let contracts = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE phone_number = $1 ORDER BY created_at DESC",
        )
        .bind(phone_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(contracts)
    }

    pub async fn lot_exists(&self, lot_number: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM contracts WHERE lot_number = $1)")
                .bind(lot_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn phone_exists(&self, phone_number: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM contracts WHERE phone_number = $1)")
                .bind(phone_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
