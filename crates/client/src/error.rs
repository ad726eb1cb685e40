//! Backend client error types.

use lexbill_shared::AppError;
use thiserror::Error;

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be read.
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status} for {url}: {body}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The configured base URL cannot have paths appended to it.
    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),

    /// An id cannot be used as a URL path segment.
    #[error("Invalid id for backend path: {0:?}")]
    InvalidPathSegment(String),

    /// The response body was not the expected JSON.
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Returns true if the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        match err {
            ClientError::Status { status: 404, .. } => Self::NotFound(message),
            ClientError::Status {
                status: 400..=499,
                body,
                ..
            } if !body.trim().is_empty() => Self::Validation(body),
            ClientError::Status {
                status: 400..=499, ..
            } => Self::Validation(message),
            ClientError::InvalidPathSegment(_) => Self::Validation(message),
            ClientError::InvalidBaseUrl(_) => Self::Internal(message),
            _ => Self::ExternalService(message),
        }
    }
}
