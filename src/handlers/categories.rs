use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{CategoriaPatch, CategoriaRequest, CategoriaResponse},
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for category endpoints
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categorias/", get(list_categories).post(create_category))
        .route(
            "/api/categorias/:id/",
            get(get_category)
                .put(replace_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categorias/",
    responses((status = 200, description = "Categories by name", body = [CategoriaResponse])),
    tag = "categorias"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .catalog_service()
        .list_categories()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(categories))
}

#[utoipa::path(
    get,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoriaResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .catalog_service()
        .get_category(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(category))
}

#[utoipa::path(
    post,
    path = "/api/categorias/",
    request_body = CategoriaRequest,
    responses(
        (status = 201, description = "Category created", body = CategoriaResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Category name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoriaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let category = state
        .catalog_service()
        .create_category(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(category))
}

#[utoipa::path(
    put,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoriaRequest,
    responses(
        (status = 200, description = "Category replaced", body = CategoriaResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Category name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn replace_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<CategoriaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let category = state
        .catalog_service()
        .update_category(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(category))
}

#[utoipa::path(
    patch,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoriaPatch,
    responses(
        (status = 200, description = "Category updated", body = CategoriaResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<CategoriaPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let category = state
        .catalog_service()
        .update_category(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(category))
}

#[utoipa::path(
    delete,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted, its parts left uncategorised"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service()
        .delete_category(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
