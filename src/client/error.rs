//! Errors returned by the remote policy client.

use thiserror::Error;

/// Result type alias for remote policy calls.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The management API answered with a non-success status.
    #[error("API error {status} ({error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },
}

impl ClientError {
    pub fn api(status: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            error_type: error_type.into(),
            message: message.into(),
        }
    }
}
