use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{RepuestoConInventarioResponse, RepuestoPatch, RepuestoRequest, RepuestoResponse},
    errors::ApiError,
    queries::{PartFilter, PartFilterParams},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for part search and global part endpoints
pub fn part_routes() -> Router<AppState> {
    Router::new()
        .route("/api/repuestos/", get(search_parts))
        .route(
            "/api/repuestos-globales/",
            get(list_global_parts).post(create_part),
        )
        .route(
            "/api/repuestos-globales/:id/",
            get(get_part)
                .put(replace_part)
                .patch(update_part)
                .delete(delete_part),
        )
}

#[utoipa::path(
    get,
    path = "/api/repuestos/",
    params(PartFilterParams),
    responses(
        (status = 200, description = "Parts matching every supplied filter", body = [RepuestoResponse]),
        (status = 400, description = "Malformed numeric filter", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn search_parts(
    State(state): State<AppState>,
    Query(params): Query<PartFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = PartFilter::try_from(params).map_err(map_service_error)?;
    let parts = state
        .catalog_service()
        .search_parts(filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(parts))
}

#[utoipa::path(
    get,
    path = "/api/repuestos-globales/",
    params(PartFilterParams),
    responses(
        (status = 200, description = "Global parts matching every supplied filter", body = [RepuestoResponse]),
        (status = 400, description = "Malformed numeric filter", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn list_global_parts(
    State(state): State<AppState>,
    Query(params): Query<PartFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = PartFilter::try_from(params).map_err(map_service_error)?;
    let parts = state
        .catalog_service()
        .search_parts(filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(parts))
}

#[utoipa::path(
    get,
    path = "/api/repuestos-globales/{id}/",
    params(("id" = i32, Path, description = "Part ID")),
    responses(
        (status = 200, description = "Part with inventory", body = RepuestoConInventarioResponse),
        (status = 404, description = "Part not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let part = state
        .catalog_service()
        .get_part(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(part))
}

#[utoipa::path(
    post,
    path = "/api/repuestos-globales/",
    request_body = RepuestoRequest,
    responses(
        (status = 201, description = "Part created", body = RepuestoConInventarioResponse),
        (status = 400, description = "Invalid request, unknown category or vehicle", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn create_part(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RepuestoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let part = state
        .catalog_service()
        .create_part(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(part))
}

#[utoipa::path(
    put,
    path = "/api/repuestos-globales/{id}/",
    params(("id" = i32, Path, description = "Part ID")),
    request_body = RepuestoRequest,
    responses(
        (status = 200, description = "Part replaced", body = RepuestoConInventarioResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Part not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn replace_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RepuestoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let part = state
        .catalog_service()
        .update_part(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(part))
}

#[utoipa::path(
    patch,
    path = "/api/repuestos-globales/{id}/",
    params(("id" = i32, Path, description = "Part ID")),
    request_body = RepuestoPatch,
    responses(
        (status = 200, description = "Part updated", body = RepuestoConInventarioResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Part not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn update_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<RepuestoPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let part = state
        .catalog_service()
        .update_part(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(part))
}

#[utoipa::path(
    delete,
    path = "/api/repuestos-globales/{id}/",
    params(("id" = i32, Path, description = "Part ID")),
    responses(
        (status = 204, description = "Part, its stock rows and compatibility links deleted"),
        (status = 404, description = "Part not found", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service()
        .delete_part(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
