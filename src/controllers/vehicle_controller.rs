use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    AddCommentRequest, CreateVehicleRequest, UpdateVehicleRequest, UpdateVehicleStatusRequest,
    UploadPhotoRequest, VehicleCommentResponse, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::notification_repository::NotificationRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::media_service::MediaService;
use crate::utils::errors::AppError;

/// Carpeta del media host para las fotos de carga
const LOADING_PHOTO_FOLDER: &str = "vehiculos/carga";

pub struct VehicleController {
    repository: VehicleRepository,
    driver_repository: DriverRepository,
    client_repository: ClientRepository,
    notification_repository: NotificationRepository,
    media: MediaService,
}

impl VehicleController {
    pub fn new(pool: PgPool, media: MediaService) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            driver_repository: DriverRepository::new(pool.clone()),
            client_repository: ClientRepository::new(pool.clone()),
            notification_repository: NotificationRepository::new(pool),
            media,
        }
    }

    /// Verificar que el usuario puede ver/operar este vehículo:
    /// admin siempre; partner si el conductor asignado es de su grupo;
    /// conductor solo si el vehículo está asignado a él.
    async fn ensure_access(
        &self,
        acting: &AuthenticatedUser,
        vehicle: &Vehicle,
    ) -> Result<(), AppError> {
        if acting.is_admin() {
            return Ok(());
        }

        let assigned = match vehicle.driver_id {
            Some(driver_id) => self.driver_repository.find_by_id(driver_id).await?,
            None => None,
        };

        if acting.is_staff() {
            // Partner: el conductor asignado debe pertenecer a su grupo
            if let (Some(driver), Some(group)) = (&assigned, &acting.partner_group) {
                if driver.partner_group.as_deref() == Some(group.as_str()) {
                    return Ok(());
                }
            }
        } else if let Some(driver) = &assigned {
            if driver.user_id == acting.user_id {
                return Ok(());
            }
        }

        Err(AppError::Forbidden(
            "No tienes permiso para acceder a este vehículo".to_string(),
        ))
    }

    async fn notify_driver(
        &self,
        driver_id: Uuid,
        vehicle: &Vehicle,
        message: String,
    ) -> Result<(), AppError> {
        if let Some(driver) = self.driver_repository.find_by_id(driver_id).await? {
            self.notification_repository
                .create(driver.user_id, vehicle.id, message)
                .await?;
        }
        Ok(())
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        self.client_repository
            .find_by_id(request.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        if let Some(driver_id) = request.driver_id {
            self.driver_repository
                .find_by_id(driver_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;
        }

        // Con conductor ya asignado el vehículo entra directo en assigned
        let status = if request.driver_id.is_some() {
            VehicleStatus::Assigned
        } else {
            VehicleStatus::Pending
        };

        let vehicle = self
            .repository
            .create(
                request.client_id,
                request.driver_id,
                request.brand,
                request.model,
                request.year,
                request.lot,
                status,
            )
            .await?;

        if let Some(driver_id) = vehicle.driver_id {
            self.notify_driver(
                driver_id,
                &vehicle,
                format!("Se te ha asignado el vehículo con lote {}", vehicle.lot),
            )
            .await?;
        }

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo registrado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self, acting: &AuthenticatedUser) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = if acting.is_admin() {
            self.repository.find_all().await?
        } else if acting.is_staff() {
            match &acting.partner_group {
                Some(group) => self.repository.find_by_partner_group(group).await?,
                None => Vec::new(),
            }
        } else {
            self.repository.find_by_driver_user(acting.user_id).await?
        };

        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get_by_id(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.ensure_access(acting, &vehicle).await?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn update(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.ensure_access(acting, &current).await?;

        if let Some(client_id) = request.client_id {
            self.client_repository
                .find_by_id(client_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;
        }

        let newly_assigned = match request.driver_id {
            Some(driver_id) => {
                self.driver_repository
                    .find_by_id(driver_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;
                current.driver_id != Some(driver_id)
            }
            None => false,
        };

        // Asignar conductor a un vehículo pendiente lo mueve a assigned
        let status = if newly_assigned && current.status == VehicleStatus::Pending {
            Some(VehicleStatus::Assigned)
        } else {
            None
        };

        let vehicle = self
            .repository
            .update(
                id,
                request.client_id,
                request.driver_id,
                request.brand,
                request.model,
                request.year,
                status,
            )
            .await?;

        if newly_assigned {
            if let Some(driver_id) = vehicle.driver_id {
                self.notify_driver(
                    driver_id,
                    &vehicle,
                    format!("Se te ha asignado el vehículo con lote {}", vehicle.lot),
                )
                .await?;
            }
        }

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    /// Transición de estado con guard lineal: solo se avanza un paso
    pub async fn update_status(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleStatusRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let target = VehicleStatus::parse(&request.status)
            .ok_or_else(|| AppError::BadRequest("Estado inválido".to_string()))?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.ensure_access(acting, &current).await?;

        if !current.status.can_transition_to(target) {
            return Err(AppError::BadRequest(format!(
                "Transición de estado inválida: {} → {}",
                current.status.as_str(),
                target.as_str()
            )));
        }

        let vehicle = self.repository.update_status(id, target).await?;

        if target == VehicleStatus::Delivered {
            if let Some(driver_id) = vehicle.driver_id {
                self.notify_driver(
                    driver_id,
                    &vehicle,
                    format!("Entrega registrada para el vehículo con lote {}", vehicle.lot),
                )
                .await?;
            }
        }

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Estado actualizado exitosamente".to_string(),
        ))
    }

    /// Subir una foto de carga a la ranura indicada. La subida al media
    /// host es independiente por ranura; no hay rollback entre ranuras.
    pub async fn upload_photo(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
        slot: u8,
        request: UploadPhotoRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        if !(1..=4).contains(&slot) {
            return Err(AppError::BadRequest(
                "La ranura de foto debe estar entre 1 y 4".to_string(),
            ));
        }

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.ensure_access(acting, &current).await?;

        let url = self
            .media
            .upload_image(&request.image_data, LOADING_PHOTO_FOLDER)
            .await?;

        let vehicle = self.repository.set_photo_slot(id, slot, url).await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Foto de carga guardada exitosamente".to_string(),
        ))
    }

    /// Agregar un comentario al log de viaje (solo inserción)
    pub async fn add_comment(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
        request: AddCommentRequest,
    ) -> Result<ApiResponse<VehicleCommentResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.ensure_access(acting, &vehicle).await?;

        let comment = self
            .repository
            .add_comment(id, acting.user_id, request.comment)
            .await?;

        Ok(ApiResponse::success(VehicleCommentResponse::from(comment)))
    }

    pub async fn list_comments(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Vec<VehicleCommentResponse>, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        self.ensure_access(acting, &vehicle).await?;

        let comments = self.repository.find_comments(id).await?;
        Ok(comments.into_iter().map(VehicleCommentResponse::from).collect())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }
}
