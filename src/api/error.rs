//! API Error Types
//!
//! Every transport failure (network, non-2xx status, undecodable body,
//! timeout) surfaces as one [`ApiError`].

use thiserror::Error;

/// Errors that can occur when talking to the Budget Buddy backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// Request never completed, timed out, or the body did not decode
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status carried by the failure, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Result type for transport operations
pub type ApiResult<T> = Result<T, ApiError>;
