use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::dto::ApiResponse;
use crate::repositories::client_repository::ClientRepository;
use crate::utils::errors::AppError;

pub struct ClientController {
    repository: ClientRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        request.validate()?;

        let client = self.repository.create(request.name, request.phone).await?;

        Ok(ApiResponse::success_with_message(
            ClientResponse::from(client),
            "Cliente creado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<ClientResponse>, AppError> {
        let clients = self.repository.find_all().await?;
        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ClientResponse, AppError> {
        let client = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        Ok(ClientResponse::from(client))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ApiResponse<ClientResponse>, AppError> {
        request.validate()?;

        let client = self.repository.update(id, request.name, request.phone).await?;

        Ok(ApiResponse::success_with_message(
            ClientResponse::from(client),
            "Cliente actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.repository.has_vehicles(id).await? {
            return Err(AppError::Conflict(
                "El cliente tiene vehículos registrados y no puede eliminarse".to_string(),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()));
        }

        Ok(())
    }
}
