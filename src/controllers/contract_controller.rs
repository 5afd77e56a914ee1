use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::contract_dto::{
    ContractResponse, CreateContractRequest, LotCheckResponse, PhoneCheckResponse,
    PhoneHistoryResponse,
};
use crate::dto::ApiResponse;
use crate::repositories::contract_repository::{ContractRepository, DUPLICATE_LOT_MESSAGE};
use crate::services::stream_service::ContractStream;
use crate::utils::errors::AppError;

pub struct ContractController {
    repository: ContractRepository,
    stream: Arc<ContractStream>,
    pool: PgPool,
}

impl ContractController {
    pub fn new(pool: PgPool, stream: Arc<ContractStream>) -> Self {
        Self {
            repository: ContractRepository::new(pool.clone()),
            stream,
            pool,
        }
    }

    /// Crear un contrato desde el formulario del portal. Tras persistir,
    /// empuja el evento new_contract y el snapshot completo a todos los
    /// clientes SSE registrados.
    pub async fn create(
        &self,
        request: CreateContractRequest,
        ip_address: Option<String>,
    ) -> Result<ApiResponse<ContractResponse>, AppError> {
        request.validate()?;

        // Pre-chequeo de unicidad; el índice único cubre la carrera
        if self.repository.lot_exists(&request.lot_number).await? {
            return Err(AppError::Conflict(DUPLICATE_LOT_MESSAGE.to_string()));
        }

        let gatepass = request.gatepass.filter(|g| !g.is_empty());

        let contract = self
            .repository
            .create(
                request.phone_number,
                request.lot_number,
                request.full_name,
                request.address,
                gatepass,
                request.owner_name,
                request.owner_phone,
                request.signature_data,
                ip_address,
            )
            .await?;

        let response = ContractResponse::from(contract);

        // Efecto secundario: los errores del fan-out no tumban el request
        self.stream.notify_new_contract(response.clone());
        if let Err(e) = self.stream.notify_clients(&self.pool).await {
            tracing::warn!("No se pudo empujar el snapshot de contratos: {}", e);
        }

        Ok(ApiResponse::success_with_message(
            response,
            "Contrato registrado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<ContractResponse>, AppError> {
        let contracts = self.repository.find_all().await?;
        Ok(contracts.into_iter().map(ContractResponse::from).collect())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Contrato no encontrado".to_string()));
        }

        if let Err(e) = self.stream.notify_clients(&self.pool).await {
            tracing::warn!("No se pudo empujar el snapshot de contratos: {}", e);
        }

        Ok(())
    }

    pub async fn check_lot(&self, lot_number: String) -> Result<LotCheckResponse, AppError> {
        let exists = self.repository.lot_exists(&lot_number).await?;
        Ok(LotCheckResponse { lot_number, exists })
    }

    pub async fn check_phone(&self, phone_number: String) -> Result<PhoneCheckResponse, AppError> {
        let exists = self.repository.phone_exists(&phone_number).await?;
        Ok(PhoneCheckResponse { phone_number, exists })
    }

    /// Historial agregado de contratos de un teléfono
    pub async fn history_by_phone(
        &self,
        phone_number: String,
    ) -> Result<PhoneHistoryResponse, AppError> {
        let contracts = self.repository.find_by_phone(&phone_number).await?;

        let mut lot_numbers: Vec<String> =
            contracts.iter().map(|c| c.lot_number.clone()).collect();
        lot_numbers.sort();
        lot_numbers.dedup();

        let responses: Vec<ContractResponse> =
            contracts.into_iter().map(ContractResponse::from).collect();

        Ok(PhoneHistoryResponse {
            phone_number,
            total_contracts: responses.len() as i64,
            lot_numbers,
            contracts: responses,
        })
    }
}
