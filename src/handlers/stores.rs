use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    validation_failed, JsonBody,
};
use crate::{
    dto::{TiendaPatch, TiendaRequest, TiendaResponse},
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for store endpoints
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tiendas/", get(list_stores).post(create_store))
        .route(
            "/api/tiendas/:id/",
            get(get_store)
                .put(replace_store)
                .patch(update_store)
                .delete(delete_store),
        )
}

#[utoipa::path(
    get,
    path = "/api/tiendas/",
    responses(
        (status = 200, description = "Stores with their branches and inventory", body = [TiendaResponse])
    ),
    tag = "tiendas"
)]
pub async fn list_stores(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stores = state
        .location_service()
        .list_stores()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(stores))
}

#[utoipa::path(
    get,
    path = "/api/tiendas/{id}/",
    params(("id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store tree", body = TiendaResponse),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tiendas"
)]
pub async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state
        .location_service()
        .get_store(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(store))
}

#[utoipa::path(
    post,
    path = "/api/tiendas/",
    request_body = TiendaRequest,
    responses(
        (status = 201, description = "Store created", body = TiendaResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Store name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "tiendas"
)]
pub async fn create_store(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<TiendaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let store = state
        .location_service()
        .create_store(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(store))
}

#[utoipa::path(
    put,
    path = "/api/tiendas/{id}/",
    params(("id" = i32, Path, description = "Store ID")),
    request_body = TiendaRequest,
    responses(
        (status = 200, description = "Store replaced", body = TiendaResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Store name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "tiendas"
)]
pub async fn replace_store(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<TiendaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let store = state
        .location_service()
        .update_store(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(store))
}

#[utoipa::path(
    patch,
    path = "/api/tiendas/{id}/",
    params(("id" = i32, Path, description = "Store ID")),
    request_body = TiendaPatch,
    responses(
        (status = 200, description = "Store updated", body = TiendaResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tiendas"
)]
pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<TiendaPatch>,
) -> Result<impl IntoResponse, ApiError> {
    payload.check().map_err(validation_failed)?;
    let store = state
        .location_service()
        .update_store(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(store))
}

#[utoipa::path(
    delete,
    path = "/api/tiendas/{id}/",
    params(("id" = i32, Path, description = "Store ID")),
    responses(
        (status = 204, description = "Store, branches and stock deleted"),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tiendas"
)]
pub async fn delete_store(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .location_service()
        .delete_store(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
