//! DTOs de vehículos

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleComment, VehicleStatus};

/// Request para registrar un vehículo en el pipeline
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub client_id: Uuid,

    pub driver_id: Option<Uuid>,

    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2030))]
    pub year: i32,

    #[validate(custom = "crate::utils::validation::validate_lot_number")]
    pub lot: String,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub client_id: Option<Uuid>,

    /// Asignar conductor; dispara pending → assigned y una notificación
    pub driver_id: Option<Uuid>,

    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,
}

/// Request para la transición de estado
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleStatusRequest {
    /// pending | assigned | loading | in_transit | delivered
    pub status: String,
}

/// Request para subir una foto de carga (data-URI base64)
#[derive(Debug, Deserialize, Validate)]
pub struct UploadPhotoRequest {
    #[validate(custom = "crate::utils::validation::validate_signature_data")]
    pub image_data: String,
}

/// Request para agregar un comentario de viaje
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 1000))]
    pub comment: String,
}

/// Response de vehículo para la API
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub lot: String,
    pub status: VehicleStatus,
    pub loading_photos: Vec<Option<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            client_id: vehicle.client_id,
            driver_id: vehicle.driver_id,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            lot: vehicle.lot,
            status: vehicle.status,
            loading_photos: vec![
                vehicle.photo_slot_1,
                vehicle.photo_slot_2,
                vehicle.photo_slot_3,
                vehicle.photo_slot_4,
            ],
            created_at: vehicle.created_at,
        }
    }
}

/// Response de comentario de viaje
#[derive(Debug, Clone, Serialize)]
pub struct VehicleCommentResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub author_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleComment> for VehicleCommentResponse {
    fn from(comment: VehicleComment) -> Self {
        Self {
            id: comment.id,
            vehicle_id: comment.vehicle_id,
            author_id: comment.author_id,
            comment: comment.comment,
            created_at: comment.created_at,
        }
    }
}
