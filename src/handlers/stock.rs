use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{RepuestoSucursalPatch, RepuestoSucursalRequest, RepuestoSucursalResponse},
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for per-branch stock endpoints
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/repuestos-sucursales/", get(list_stock).post(create_stock))
        .route(
            "/api/repuestos-sucursales/:id/",
            get(get_stock)
                .put(replace_stock)
                .patch(update_stock)
                .delete(delete_stock),
        )
}

#[utoipa::path(
    get,
    path = "/api/repuestos-sucursales/",
    responses((status = 200, description = "Stock rows by id", body = [RepuestoSucursalResponse])),
    tag = "repuestos-sucursales"
)]
pub async fn list_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .catalog_service()
        .list_stock()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

#[utoipa::path(
    get,
    path = "/api/repuestos-sucursales/{id}/",
    params(("id" = i32, Path, description = "Stock row ID")),
    responses(
        (status = 200, description = "Stock row", body = RepuestoSucursalResponse),
        (status = 404, description = "Stock row not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos-sucursales"
)]
pub async fn get_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .catalog_service()
        .get_stock(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(row))
}

#[utoipa::path(
    post,
    path = "/api/repuestos-sucursales/",
    request_body = RepuestoSucursalRequest,
    responses(
        (status = 201, description = "Stock row created", body = RepuestoSucursalResponse),
        (status = 400, description = "Invalid request, unknown branch or part", body = crate::errors::ErrorResponse),
        (status = 409, description = "Branch already stocks this part", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos-sucursales"
)]
pub async fn create_stock(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RepuestoSucursalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let row = state
        .catalog_service()
        .create_stock(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(row))
}

#[utoipa::path(
    put,
    path = "/api/repuestos-sucursales/{id}/",
    params(("id" = i32, Path, description = "Stock row ID")),
    request_body = RepuestoSucursalRequest,
    responses(
        (status = 200, description = "Stock row replaced", body = RepuestoSucursalResponse),
        (status = 404, description = "Stock row not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Branch already stocks this part", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos-sucursales"
)]
pub async fn replace_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RepuestoSucursalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let row = state
        .catalog_service()
        .update_stock(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(row))
}

#[utoipa::path(
    patch,
    path = "/api/repuestos-sucursales/{id}/",
    params(("id" = i32, Path, description = "Stock row ID")),
    request_body = RepuestoSucursalPatch,
    responses(
        (status = 200, description = "Stock row updated", body = RepuestoSucursalResponse),
        (status = 404, description = "Stock row not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Branch already stocks this part", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos-sucursales"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RepuestoSucursalPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let row = state
        .catalog_service()
        .update_stock(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(row))
}

#[utoipa::path(
    delete,
    path = "/api/repuestos-sucursales/{id}/",
    params(("id" = i32, Path, description = "Stock row ID")),
    responses(
        (status = 204, description = "Stock row deleted"),
        (status = 404, description = "Stock row not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos-sucursales"
)]
pub async fn delete_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service()
        .delete_stock(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
