//! Ensamblado del router de la API

pub mod auth_routes;
pub mod client_routes;
pub mod contract_routes;
pub mod driver_routes;
pub mod notification_routes;
pub mod state_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/contracts", contract_routes::create_contract_router(state.clone()))
        .nest("/api/users", user_routes::create_user_router(state.clone()))
        .nest("/api/clients", client_routes::create_client_router(state.clone()))
        .nest("/api/drivers", driver_routes::create_driver_router(state.clone()))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router(state.clone()))
        .nest("/api/notifications", notification_routes::create_notification_router(state.clone()))
        .nest("/api/states", state_routes::create_state_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "transport-logistics",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
