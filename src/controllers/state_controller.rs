use sqlx::PgPool;

use crate::models::state::State;
use crate::repositories::state_repository::StateRepository;
use crate::utils::errors::AppError;

pub struct StateController {
    repository: StateRepository,
}

impl StateController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StateRepository::new(pool),
        }
    }

    /// Catálogo de estados del pipeline, ordenado por posición
    pub async fn list(&self) -> Result<Vec<State>, AppError> {
        self.repository.find_all().await
    }
}
