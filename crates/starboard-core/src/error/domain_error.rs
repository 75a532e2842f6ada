//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::ChannelKind;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Channel {id} has the wrong kind: expected {expected}, got {actual:?}")]
    InvalidChannelKind {
        id: Snowflake,
        expected: &'static str,
        actual: ChannelKind,
    },

    #[error("Missing permission: {0}")]
    MissingPermission(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Remote API error: {0}")]
    RemoteError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidChannelKind { .. } => "INVALID_CHANNEL_KIND",
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::RemoteError(_) => "REMOTE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    ///
    /// Lookup errors mean there is nothing left to reconcile.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MessageNotFound(_) | Self::ChannelNotFound(_))
    }

    /// Check if this is a configuration/validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidChannelKind { .. } | Self::MissingPermission(_)
        )
    }

    /// Check if retrying the same operation later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::RemoteError(_))
    }
}
