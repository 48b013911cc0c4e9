use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

/// Transport-level error: HTTP status plus a machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "EMPLOYEES_VALIDATION", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            error: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map a domain error to its HTTP representation.
///
/// Internal store detail is logged but never leaked to clients.
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::EmployeeNotFound { id } => ApiError::new(
            StatusCode::NOT_FOUND,
            "EMPLOYEES_NOT_FOUND",
            format!("Employee with id {id} was not found"),
        ),
        DomainError::DuplicateEmail { email } => ApiError::new(
            StatusCode::CONFLICT,
            "EMPLOYEES_EMAIL_CONFLICT",
            format!("Employee with email '{email}' already exists"),
        ),
        DomainError::Validation { field, message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            "EMPLOYEES_VALIDATION",
            format!("{field}: {message}"),
        ),
        DomainError::StoreUnavailable { .. } => {
            tracing::error!(error = ?e, "Store unavailable");
            ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The employee store is currently unavailable",
            )
        }
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error occurred");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "An internal database error occurred",
            )
        }
    }
}
