//! Client error types

use thiserror::Error;

/// Result alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures of a call against the Gatekeep API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, timeout or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected status {status}: {message}")]
    Status {
        status: u16,
        /// Error code from the response body, when it carried one
        code: Option<String>,
        message: String,
    },

    /// The caller cancelled the call before it completed
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// HTTP status of a rejected call
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Cancelled => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
