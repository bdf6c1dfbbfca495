use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::sales_target::SalesTargetError;

/// API error type with HTTP status code and message
///
/// Rendered as `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<SalesTargetError> for ApiError {
    fn from(error: SalesTargetError) -> Self {
        let message = error.to_string();
        match error {
            SalesTargetError::UserNotFound(_)
            | SalesTargetError::NotFound(_)
            | SalesTargetError::NoActiveTarget => Self::not_found(message),
            SalesTargetError::TargetExists | SalesTargetError::TargetExistsForUser => {
                Self::conflict(message)
            }
            SalesTargetError::InvalidUser(_)
            | SalesTargetError::InvalidPeriod(_)
            | SalesTargetError::NegativeAmount => Self::bad_request(message),
            SalesTargetError::Persistence { .. } => Self::internal_server_error(message),
        }
    }
}

/// Successful mutation reply: `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn with(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
        })
    }
}

impl ApiSuccess<()> {
    pub fn empty() -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn duplicate_period_is_conflict() {
        let err = ApiError::from(SalesTargetError::TargetExists);
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(err.message.starts_with("Target untuk periode ini sudah ada"));
    }

    #[test]
    fn missing_user_is_not_found() {
        let err = ApiError::from(SalesTargetError::UserNotFound(Uuid::new_v4()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn persistence_failure_carries_message() {
        let err = ApiError::from(SalesTargetError::Persistence {
            operation: "create sales target",
            source: crate::domain::repositories::RepositoryError::Database("boom".into()),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to create sales target: database error: boom");
    }
}
