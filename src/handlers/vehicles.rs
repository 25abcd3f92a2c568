use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    dto::{VehiculoPatch, VehiculoRequest, VehiculoResponse},
    errors::ApiError,
    AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Creates the router for vehicle endpoints
pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/api/vehiculos/", get(list_vehicles).post(create_vehicle))
        .route(
            "/api/vehiculos/:id/",
            get(get_vehicle)
                .put(replace_vehicle)
                .patch(update_vehicle)
                .delete(delete_vehicle),
        )
}

#[utoipa::path(
    get,
    path = "/api/vehiculos/",
    responses((status = 200, description = "Vehicles by brand, model and year", body = [VehiculoResponse])),
    tag = "vehiculos"
)]
pub async fn list_vehicles(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let vehicles = state
        .catalog_service()
        .list_vehicles()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(vehicles))
}

#[utoipa::path(
    get,
    path = "/api/vehiculos/{id}/",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = VehiculoResponse),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vehiculos"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state
        .catalog_service()
        .get_vehicle(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(vehicle))
}

#[utoipa::path(
    post,
    path = "/api/vehiculos/",
    request_body = VehiculoRequest,
    responses(
        (status = 201, description = "Vehicle created", body = VehiculoResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Brand, model and year already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vehiculos"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VehiculoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let vehicle = state
        .catalog_service()
        .create_vehicle(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(vehicle))
}

#[utoipa::path(
    put,
    path = "/api/vehiculos/{id}/",
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = VehiculoRequest,
    responses(
        (status = 200, description = "Vehicle replaced", body = VehiculoResponse),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Brand, model and year already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vehiculos"
)]
pub async fn replace_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<VehiculoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let vehicle = state
        .catalog_service()
        .update_vehicle(id, payload.into())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(vehicle))
}

#[utoipa::path(
    patch,
    path = "/api/vehiculos/{id}/",
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = VehiculoPatch,
    responses(
        (status = 200, description = "Vehicle updated", body = VehiculoResponse),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Brand, model and year already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vehiculos"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<VehiculoPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let vehicle = state
        .catalog_service()
        .update_vehicle(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(vehicle))
}

#[utoipa::path(
    delete,
    path = "/api/vehiculos/{id}/",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 204, description = "Vehicle and its compatibility links deleted"),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vehiculos"
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .catalog_service()
        .delete_vehicle(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}
