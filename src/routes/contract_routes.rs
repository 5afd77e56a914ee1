use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::sse::Sse,
    routing::{delete, get, post},
    Json, Router,
};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::controllers::contract_controller::ContractController;
use crate::dto::contract_dto::{
    ContractResponse, CreateContractRequest, LotCheckResponse, PhoneCheckResponse,
    PhoneHistoryResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::services::stream_service::ClientEventStream;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_contract_router(state: AppState) -> Router<AppState> {
    // El formulario de firma y el stream son públicos; el listado y el
    // borrado son de administración
    let public = Router::new()
        .route("/", post(create_contract))
        .route("/check-lot/:lot", get(check_lot))
        .route("/check-phone/:phone", get(check_phone))
        .route("/by-phone/:phone", get(history_by_phone))
        .route("/stream", get(contract_stream));

    let admin = Router::new()
        .route("/", get(list_contracts))
        .route("/:id", delete(delete_contract))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(admin)
}

/// IP del cliente detrás del proxy inverso
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        })
}

async fn create_contract(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateContractRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContractResponse>>), AppError> {
    let controller = ContractController::new(state.pool.clone(), state.stream.clone());
    let response = controller.create(request, client_ip(&headers)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_contracts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContractResponse>>, AppError> {
    let controller = ContractController::new(state.pool.clone(), state.stream.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn delete_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = ContractController::new(state.pool.clone(), state.stream.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Contrato eliminado exitosamente"
    })))
}

async fn check_lot(
    State(state): State<AppState>,
    Path(lot): Path<String>,
) -> Result<Json<LotCheckResponse>, AppError> {
    let controller = ContractController::new(state.pool.clone(), state.stream.clone());
    let response = controller.check_lot(lot).await?;
    Ok(Json(response))
}

async fn check_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<PhoneCheckResponse>, AppError> {
    let controller = ContractController::new(state.pool.clone(), state.stream.clone());
    let response = controller.check_phone(phone).await?;
    Ok(Json(response))
}

async fn history_by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<PhoneHistoryResponse>, AppError> {
    let controller = ContractController::new(state.pool.clone(), state.stream.clone());
    let response = controller.history_by_phone(phone).await?;
    Ok(Json(response))
}

/// Conexión SSE: registra al cliente, le empuja el snapshot inicial y
/// devuelve el stream de eventos. Al cerrar la conexión el stream se
/// desregistra solo.
async fn contract_stream(State(state): State<AppState>) -> Sse<ClientEventStream> {
    let (sender, receiver) = mpsc::unbounded_channel();
    let id = state.stream.add_client(sender.clone());

    if let Err(e) = state.stream.send_update(&sender, &state.pool).await {
        tracing::warn!("Snapshot inicial no enviado al cliente SSE {}: {}", id, e);
    }

    Sse::new(ClientEventStream::new(id, state.stream.clone(), receiver))
}
