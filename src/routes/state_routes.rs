use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::controllers::state_controller::StateController;
use crate::middleware::auth::auth_middleware;
use crate::models::state::State as PipelineState;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_state_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_states))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_states(
    State(state): State<AppState>,
) -> Result<Json<Vec<PipelineState>>, AppError> {
    let controller = StateController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}
