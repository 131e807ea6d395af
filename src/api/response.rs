//! Response types for the employee directory HTTP layer.
//!
//! This module defines the JSON bodies of the search and utility endpoints
//! and the mapping from [`DirectoryError`] to HTTP errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::models::Employee;
use crate::schema::EmployeeRecord;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates the generic error used for failures users cannot fix.
    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An unexpected error occurred")
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` with a malformed JSON body.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::malformed_json(message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<DirectoryError> for ApiErrorResponse {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::InvalidFormat { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_FORMAT",
                    format!("Invalid value for '{}'", field),
                    message,
                ),
            },
            DirectoryError::InvalidDateFormat { value } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_DATE_FORMAT",
                    "Invalid date format. Please use YYYY-MM-DD.",
                    format!("Received '{}'", value),
                ),
            },
            DirectoryError::NotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("EMPLOYEE_NOT_FOUND", format!("Employee {} not found", id)),
            },
            DirectoryError::DuplicateEmail { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("DUPLICATE_EMAIL", "Employee with this email already exists"),
            },
            // store and config failures never leak their detail to clients
            _ => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::internal(),
            },
        }
    }
}

/// Body of the AJAX `GET /search` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching employees in insertion order.
    pub employees: Vec<EmployeeRecord>,
}

impl SearchResponse {
    /// Serializes `employees` for the response.
    pub fn new(employees: &[Employee]) -> Self {
        Self {
            employees: employees.iter().map(EmployeeRecord::from).collect(),
        }
    }
}

/// Body of `GET /api/employees/hired-after`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiredAfterResponse {
    /// The cutoff date as given.
    pub date: String,
    /// Employees hired after the cutoff.
    pub employees: Vec<EmployeeRecord>,
}
