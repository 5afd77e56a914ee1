use sqlx::PgPool;

use crate::models::state::State;
use crate::utils::errors::AppError;

pub struct StateRepository {
    pool: PgPool,
}

impl StateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<State>, AppError> {
        let states = sqlx::query_as::<_, State>("SELECT * FROM states ORDER BY position ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(states)
    }
}
