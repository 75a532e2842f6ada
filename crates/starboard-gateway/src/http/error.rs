//! REST client errors

use starboard_core::DomainError;
use thiserror::Error;

/// Failure talking to the Discord REST API
///
/// 403 and 404 never show up here; they are reported as outcomes.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Discord returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Rate limited on {route}, gave up after {attempts} attempts")]
    RateLimited { route: String, attempts: u32 },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<HttpError> for DomainError {
    fn from(err: HttpError) -> Self {
        DomainError::RemoteError(err.to_string())
    }
}
