use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::notification_dto::NotificationResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::notification_repository::NotificationRepository;
use crate::utils::errors::AppError;

pub struct NotificationController {
    repository: NotificationRepository,
}

impl NotificationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotificationRepository::new(pool),
        }
    }

    /// Notificaciones del usuario autenticado, más recientes primero
    pub async fn list(
        &self,
        acting: &AuthenticatedUser,
    ) -> Result<Vec<NotificationResponse>, AppError> {
        let notifications = self.repository.find_by_user(acting.user_id).await?;
        Ok(notifications.into_iter().map(NotificationResponse::from).collect())
    }

    /// Marcar como leída; solo el dueño puede hacerlo
    pub async fn mark_read(
        &self,
        acting: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ApiResponse<NotificationResponse>, AppError> {
        let notification = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notificación no encontrada".to_string()))?;

        if notification.user_id != acting.user_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para modificar esta notificación".to_string(),
            ));
        }

        let notification = self.repository.mark_read(id).await?;

        Ok(ApiResponse::success(NotificationResponse::from(notification)))
    }
}
