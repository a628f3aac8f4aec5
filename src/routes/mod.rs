use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use log::error;

use crate::dto::api::{ApiError, ApiResponse};
use crate::services::ServiceError;

pub mod customers;

/// Maps a service failure to the uniform error envelope. This is the single
/// boundary where the error taxonomy turns into HTTP statuses.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let (status, field) = match err {
        ServiceError::Validation { field, .. } => (StatusCode::BAD_REQUEST, Some(field.clone())),
        ServiceError::Conflict { field, .. } => (StatusCode::CONFLICT, Some(field.clone())),
        ServiceError::NotFound { field, .. } => (StatusCode::NOT_FOUND, Some(field.clone())),
        ServiceError::Internal(detail) => {
            error!("Internal error: {detail}");
            (StatusCode::INTERNAL_SERVER_ERROR, None)
        }
    };

    HttpResponse::build(status).json(ApiResponse::error(ApiError {
        status_code: status.as_u16(),
        field,
        message: err.to_string(),
    }))
}
