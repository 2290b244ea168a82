use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::errors::PlannerError;

/// API error type with HTTP status code and message
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

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        let status = match err {
            PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::TemplateMismatch(_) => StatusCode::BAD_REQUEST,
            PlannerError::Upstream(_) | PlannerError::MalformedCompletion(_) => {
                StatusCode::BAD_GATEWAY
            }
            PlannerError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(PlannerError::NotFound("template".to_string()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("template"));
    }

    #[test]
    fn template_mismatch_maps_to_400() {
        let err = ApiError::from(PlannerError::TemplateMismatch("bad placeholder".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let err = ApiError::from(PlannerError::Unavailable("connection refused".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_completion_maps_to_502() {
        let err = ApiError::from(PlannerError::MalformedCompletion("not json".to_string()));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }
}
