use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{ProfesionalPatch, ProfesionalRequest, ProfesionalResponse},
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for professional (workshop) endpoints
pub fn professional_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/profesionales/",
            get(list_professionals).post(create_professional),
        )
        .route(
            "/api/profesionales/:id/",
            get(get_professional)
                .put(replace_professional)
                .patch(update_professional)
                .delete(delete_professional),
        )
}

#[utoipa::path(
    get,
    path = "/api/profesionales/",
    responses((status = 200, description = "Workshops, featured first", body = [ProfesionalResponse])),
    tag = "profesionales"
)]
pub async fn list_professionals(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let professionals = state
        .location_service()
        .list_professionals()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(professionals))
}

#[utoipa::path(
    get,
    path = "/api/profesionales/{id}/",
    params(("id" = i32, Path, description = "Professional ID")),
    responses(
        (status = 200, description = "Workshop", body = ProfesionalResponse),
        (status = 404, description = "Professional not found", body = crate::errors::ErrorResponse)
    ),
    tag = "profesionales"
)]
pub async fn get_professional(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let professional = state
        .location_service()
        .get_professional(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(professional))
}

#[utoipa::path(
    post,
    path = "/api/profesionales/",
    request_body = ProfesionalRequest,
    responses(
        (status = 201, description = "Workshop created", body = ProfesionalResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "profesionales"
)]
pub async fn create_professional(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProfesionalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let professional = state
        .location_service()
        .create_professional(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(professional))
}

#[utoipa::path(
    put,
    path = "/api/profesionales/{id}/",
    params(("id" = i32, Path, description = "Professional ID")),
    request_body = ProfesionalRequest,
    responses(
        (status = 200, description = "Workshop replaced", body = ProfesionalResponse),
        (status = 404, description = "Professional not found", body = crate::errors::ErrorResponse)
    ),
    tag = "profesionales"
)]
pub async fn replace_professional(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<ProfesionalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let professional = state
        .location_service()
        .update_professional(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(professional))
}

#[utoipa::path(
    patch,
    path = "/api/profesionales/{id}/",
    params(("id" = i32, Path, description = "Professional ID")),
    request_body = ProfesionalPatch,
    responses(
        (status = 200, description = "Workshop updated", body = ProfesionalResponse),
        (status = 404, description = "Professional not found", body = crate::errors::ErrorResponse)
    ),
    tag = "profesionales"
)]
pub async fn update_professional(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<ProfesionalPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let professional = state
        .location_service()
        .update_professional(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(professional))
}

#[utoipa::path(
    delete,
    path = "/api/profesionales/{id}/",
    params(("id" = i32, Path, description = "Professional ID")),
    responses(
        (status = 204, description = "Workshop deleted"),
        (status = 404, description = "Professional not found", body = crate::errors::ErrorResponse)
    ),
    tag = "profesionales"
)]
pub async fn delete_professional(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .location_service()
        .delete_professional(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
