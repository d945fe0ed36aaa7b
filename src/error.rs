//! Error types of the service.
//!
//! [`ApiError`] is what handlers return; it renders as a JSON body of the
//! form `{"detail": "..."}` with the matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failure to run the external tool. A tool that ran and failed is not a
/// `ToolError`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to execute `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed while waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A path named in the request does not exist (400).
    #[error("{0}")]
    InvalidInput(String),

    /// The requested file does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Logs `err` in full and wraps it as an internal error whose detail
    /// starts with `context`.
    pub fn internal(context: &str, err: &(dyn std::error::Error + 'static)) -> Self {
        log::error!("{context}: {err:?}");
        ApiError::Internal(format!("{context}: {err}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_keeps_context_prefix() {
        let err = ToolError::Spawn {
            program: "iopaint".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        let api_error = ApiError::internal("Server error", &err);

        assert_eq!(
            api_error.to_string(),
            "Server error: failed to execute `iopaint`: no such file"
        );
    }

    #[test]
    fn wait_failure_names_the_step() {
        let err = ToolError::Wait {
            program: "iopaint".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        };

        let api_error = ApiError::internal("Server error", &err);

        assert_eq!(
            api_error.to_string(),
            "Server error: failed while waiting on `iopaint`: pipe closed"
        );
    }
}
