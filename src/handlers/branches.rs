use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{SucursalPatch, SucursalRequest, SucursalResponse},
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for branch endpoints
pub fn branch_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sucursales/", get(list_branches).post(create_branch))
        .route(
            "/api/sucursales/:id/",
            get(get_branch)
                .put(replace_branch)
                .patch(update_branch)
                .delete(delete_branch),
        )
}

#[utoipa::path(
    get,
    path = "/api/sucursales/",
    responses(
        (status = 200, description = "Branches with their inventory", body = [SucursalResponse])
    ),
    tag = "sucursales"
)]
pub async fn list_branches(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let branches = state
        .location_service()
        .list_branches()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(branches))
}

#[utoipa::path(
    get,
    path = "/api/sucursales/{id}/",
    params(("id" = i32, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "Branch with inventory", body = SucursalResponse),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sucursales"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let branch = state
        .location_service()
        .get_branch(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(branch))
}

#[utoipa::path(
    post,
    path = "/api/sucursales/",
    request_body = SucursalRequest,
    responses(
        (status = 201, description = "Branch created", body = SucursalResponse),
        (status = 400, description = "Invalid request or unknown store", body = crate::errors::ErrorResponse)
    ),
    tag = "sucursales"
)]
pub async fn create_branch(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SucursalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let branch = state
        .location_service()
        .create_branch(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(branch))
}

#[utoipa::path(
    put,
    path = "/api/sucursales/{id}/",
    params(("id" = i32, Path, description = "Branch ID")),
    request_body = SucursalRequest,
    responses(
        (status = 200, description = "Branch replaced", body = SucursalResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sucursales"
)]
pub async fn replace_branch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<SucursalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let branch = state
        .location_service()
        .update_branch(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(branch))
}

#[utoipa::path(
    patch,
    path = "/api/sucursales/{id}/",
    params(("id" = i32, Path, description = "Branch ID")),
    request_body = SucursalPatch,
    responses(
        (status = 200, description = "Branch updated", body = SucursalResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sucursales"
)]
pub async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<SucursalPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let branch = state
        .location_service()
        .update_branch(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(branch))
}

#[utoipa::path(
    delete,
    path = "/api/sucursales/{id}/",
    params(("id" = i32, Path, description = "Branch ID")),
    responses(
        (status = 204, description = "Branch and its stock deleted"),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sucursales"
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .location_service()
        .delete_branch(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
