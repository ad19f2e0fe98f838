//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::models::BookedPeriod;
use crate::services::availability::ValidationError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Conflicting booked periods (overlap conflicts only), ordered by
    /// check-in date ascending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<BookedPeriod>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            conflicts: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_conflicts(mut self, conflicts: Vec<BookedPeriod>) -> Self {
        self.conflicts = Some(conflicts);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Malformed request input
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error (includes reservation validation failures)
    Repository(RepositoryError),
}

/// Map an engine validation failure to a status and response body.
///
/// Date and capacity violations are well-formed but unprocessable input
/// (422); an overlap is contention with existing state (409) and carries the
/// ordered conflict list so clients can present "already booked for these
/// periods" diagnostics.
fn validation_response(err: &ValidationError) -> (StatusCode, ApiError) {
    match err {
        ValidationError::InvalidDateRange { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::new("INVALID_DATE_RANGE", err.to_string()),
        ),
        ValidationError::CapacityExceeded { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::new("CAPACITY_EXCEEDED", err.to_string()),
        ),
        ValidationError::OverlapConflict { conflicts } => (
            StatusCode::CONFLICT,
            ApiError::new("OVERLAP_CONFLICT", err.to_string())
                .with_conflicts(conflicts.clone()),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => match &e {
                RepositoryError::NotFound { message, .. } => (
                    StatusCode::NOT_FOUND,
                    ApiError::new("NOT_FOUND", message.clone()),
                ),
                RepositoryError::Validation { source, .. } => validation_response(source),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("REPOSITORY_ERROR", e.to_string()),
                ),
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(m: u32, d_in: u32, d_out: u32) -> BookedPeriod {
        BookedPeriod {
            check_in: NaiveDate::from_ymd_opt(2024, m, d_in).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, m, d_out).unwrap(),
        }
    }

    #[test]
    fn test_overlap_conflict_body_carries_periods() {
        let err = ValidationError::OverlapConflict {
            conflicts: vec![period(6, 1, 5)],
        };
        let (status, body) = validation_response(&err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "OVERLAP_CONFLICT");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["conflicts"][0]["check_in"], "2024-06-01");
        assert_eq!(json["conflicts"][0]["check_out"], "2024-06-05");
    }

    #[test]
    fn test_date_and_capacity_errors_are_unprocessable() {
        let err = ValidationError::InvalidDateRange {
            check_in: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        };
        let (status, body) = validation_response(&err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "INVALID_DATE_RANGE");
        assert!(body.conflicts.is_none());

        let err = ValidationError::CapacityExceeded {
            requested: 5,
            capacity: 4,
        };
        let (status, body) = validation_response(&err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "CAPACITY_EXCEEDED");
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let body = ApiError::new("NOT_FOUND", "Unit 1 not found");
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("conflicts").is_none());
    }
}
