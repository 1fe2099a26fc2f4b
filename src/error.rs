//! Error types for the RBAC policy adapter.
//!
//! Every failure a request can hit maps to exactly one status code and a
//! `{"error": "..."}` body.

use axum::http::StatusCode;
use thiserror::Error;

use crate::client::ClientError;
use crate::domain::{BodyDecodeError, TargetGroupResponse};

/// Request-level failure.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Invalid request body: {0}")]
    UndecodableBody(#[from] BodyDecodeError),

    #[error("Failed to get RBAC policy: {0}")]
    GetPolicy(#[source] ClientError),

    #[error("Failed to set RBAC policy: {0}")]
    SetPolicy(#[source] ClientError),

    #[error("Failed to get current RBAC policy: {0}")]
    GetCurrentPolicy(#[source] ClientError),

    #[error("Failed to clear RBAC policy: {0}")]
    ClearPolicy(#[source] ClientError),

    #[error("Failed to marshal response")]
    Serialization(#[source] serde_json::Error),
}

impl AdapterError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdapterError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AdapterError::InvalidBody(_) | AdapterError::UndecodableBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AdapterError::GetPolicy(_)
            | AdapterError::SetPolicy(_)
            | AdapterError::GetCurrentPolicy(_)
            | AdapterError::ClearPolicy(_)
            | AdapterError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the failure once and turn it into the response sent back.
    pub fn into_response(self) -> TargetGroupResponse {
        let status = self.status();
        match &self {
            AdapterError::MethodNotAllowed => {
                tracing::warn!(status = status.as_u16(), "Method not allowed");
            }
            AdapterError::InvalidBody(e) => {
                tracing::error!(error = %e, "Failed to unmarshal request body");
            }
            AdapterError::UndecodableBody(e) => {
                tracing::error!(error = %e, "Failed to decode request body");
            }
            AdapterError::Serialization(e) => {
                // Detail stays in the log, not the response
                tracing::error!(error = %e, "Failed to marshal response");
            }
            AdapterError::GetPolicy(e)
            | AdapterError::SetPolicy(e)
            | AdapterError::GetCurrentPolicy(e)
            | AdapterError::ClearPolicy(e) => {
                tracing::error!(error = %e, "{}", self.operation());
            }
        }

        TargetGroupResponse::error(status, &self.to_string())
    }

    fn operation(&self) -> &'static str {
        match self {
            AdapterError::GetPolicy(_) => "Failed to get RBAC policy",
            AdapterError::SetPolicy(_) => "Failed to set RBAC policy",
            AdapterError::GetCurrentPolicy(_) => "Failed to get current RBAC policy",
            AdapterError::ClearPolicy(_) => "Failed to clear RBAC policy",
            _ => "Request failed",
        }
    }
}

/// Result type alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
