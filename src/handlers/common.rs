use crate::errors::{ApiError, ServiceError};
use crate::hours;
use crate::AppState;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(validation_failed)
}

pub fn validation_failed(err: ValidationErrors) -> ApiError {
    ApiError::ValidationError(format!("Validation failed: {}", err))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Local wall-clock time used for open/closed evaluation
pub fn local_now(state: &AppState) -> NaiveDateTime {
    hours::local_now(state.config.local_offset())
}

/// JSON body whose rejections render as a 400 `ErrorResponse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::BadRequest {
                message: rejection.body_text(),
                error_code: Some("INVALID_JSON".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1))]
        nombre: String,
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = validate_input(&Named {
            nombre: String::new(),
        })
        .unwrap_err();
        assert_matches!(err, ApiError::ValidationError(msg) if msg.contains("nombre"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"nombre\": "))
            .unwrap();
        let rejected = JsonBody::<serde_json::Value>::from_request(req, &()).await;
        let response = rejected.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
