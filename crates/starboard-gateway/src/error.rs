//! Gateway error types

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::http::HttpError;
use crate::protocol::CloseCode;

/// Gateway client error
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Invalid gateway payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Gateway closed the connection: {0}")]
    Closed(CloseCode),

    #[error("Gave up reconnecting after {0} attempts")]
    ReconnectExhausted(u32),

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl GatewayError {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Whether reconnecting cannot help
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed(_) | Self::ReconnectExhausted(_))
    }
}
