//! Application error types
//!
//! Unified error handling for the binary and the layers it wires together.

use starboard_core::DomainError;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Database errors (pool creation, schema bootstrap)
    #[error("Database error: {0}")]
    Database(String),

    // Discord gateway / REST errors
    #[error("Discord error: {0}")]
    Discord(String),

    // Telemetry setup errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Discord(_) => "DISCORD_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if the failure is worth retrying (e.g. restarting the process)
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(_) | Self::Discord(_) => true,
            Self::Domain(e) => e.is_retryable(),
            Self::Config(_) | Self::Telemetry(_) | Self::Internal(_) => false,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
