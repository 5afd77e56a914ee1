use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    AddCommentRequest, CreateVehicleRequest, UpdateVehicleRequest, UpdateVehicleStatusRequest,
    UploadPhotoRequest, VehicleCommentResponse, VehicleResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{
    admin_only_middleware, auth_middleware, staff_only_middleware, AuthenticatedUser,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    // Alta y edición son de staff (admin/partner); el borrado es solo de
    // admin; consulta, transición de estado, fotos y comentarios quedan
    // para cualquier usuario autenticado con acceso al vehículo
    let staff = Router::new()
        .route("/", post(create_vehicle))
        .route("/:id", put(update_vehicle))
        .route_layer(middleware::from_fn(staff_only_middleware));

    let admin = Router::new()
        .route("/:id", delete(delete_vehicle))
        .route_layer(middleware::from_fn(admin_only_middleware));

    let authenticated = Router::new()
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id/status", patch(update_status))
        .route("/:id/photos/:slot", post(upload_photo))
        .route("/:id/comments", post(add_comment))
        .route("/:id/comments", get(list_comments));

    staff
        .merge(admin)
        .merge(authenticated)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleStatusRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.update_status(&user, id, request).await?;
    Ok(Json(response))
}

async fn upload_photo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, slot)): Path<(Uuid, u8)>,
    Json(request): Json<UploadPhotoRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.upload_photo(&user, id, slot, request).await?;
    Ok(Json(response))
}

async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleCommentResponse>>), AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.add_comment(&user, id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_comments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VehicleCommentResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    let response = controller.list_comments(&user, id).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleController::new(state.pool.clone(), state.media.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Vehículo eliminado exitosamente"
    })))
}
