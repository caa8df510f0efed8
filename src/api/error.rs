//! API Error Types

use thiserror::Error;

use crate::json::ExtJsonError;

/// Errors returned by [`super::ApiClient`]
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    /// The backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Failure inside a non-HTTP transport
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Status code of the backend response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ExtJsonError> for ApiError {
    fn from(err: ExtJsonError) -> Self {
        ApiError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}
