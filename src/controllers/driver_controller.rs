use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::driver_repository::{DriverRepository, DriverWithUser};
use crate::services::driver_service::DriverService;
use crate::utils::errors::AppError;

pub struct DriverController {
    repository: DriverRepository,
    service: DriverService,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool.clone()),
            service: DriverService::new(pool),
        }
    }

    fn to_response(driver: DriverWithUser) -> DriverResponse {
        DriverResponse {
            id: driver.id,
            user_id: driver.user_id,
            username: driver.username,
            name: driver.name,
            phone: driver.phone,
            license_number: driver.license_number,
            partner_group: driver.partner_group,
            created_at: driver.created_at,
        }
    }

    /// Un partner solo ve y gestiona conductores de su propio grupo
    fn ensure_group_access(
        acting: &AuthenticatedUser,
        partner_group: Option<&str>,
    ) -> Result<(), AppError> {
        if acting.is_admin() {
            return Ok(());
        }
        if acting.partner_group.as_deref() == partner_group && partner_group.is_some() {
            return Ok(());
        }
        Err(AppError::Forbidden(
            "No tienes permiso para gestionar este conductor".to_string(),
        ))
    }

    pub async fn create(
        &self,
        acting: &AuthenticatedUser,
        mut request: CreateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        // Un partner siempre crea conductores dentro de su propio grupo
        if !acting.is_admin() {
            request.partner_group = acting.partner_group.clone();
        }

        request.validate()?;

        let driver = self.service.create_driver(request).await?;

        Ok(ApiResponse::success_with_message(
            driver,
            "Conductor creado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self, acting: &AuthenticatedUser) -> Result<Vec<DriverResponse>, AppError> {
        let drivers = if acting.is_admin() {
            self.repository.find_all().await?
        } else {
            match &acting.partner_group {
                Some(group) => self.repository.find_by_partner_group(group).await?,
                None => Vec::new(),
            }
        };

        Ok(drivers.into_iter().map(Self::to_response).collect())
    }

    pub async fn get_by_id(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<DriverResponse, AppError> {
        let driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        Self::ensure_group_access(acting, driver.partner_group.as_deref())?;

        Ok(Self::to_response(driver))
    }

    pub async fn update(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
        mut request: UpdateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        Self::ensure_group_access(acting, current.partner_group.as_deref())?;

        // Un partner no puede mover conductores a otro grupo
        if !acting.is_admin() {
            request.partner_group = None;
        }

        request.validate()?;

        let driver = self.service.update_driver(id, request).await?;

        Ok(ApiResponse::success_with_message(
            driver,
            "Conductor actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, acting: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        Self::ensure_group_access(acting, current.partner_group.as_deref())?;

        self.service.delete_driver(id).await
    }
}
