//! Collaborator traits - the message source, the mirror sink, and metrics

use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{Message, MessageLocation, MirrorOutcome, MirrorPost};
use crate::error::DomainError;
use crate::traits::RepoResult;
use crate::value_objects::Snowflake;

/// Result type for mirror-destination operations
///
/// `Ok` carries recoverable outcomes (`NotFound`, `Forbidden`); `Err` is fatal.
pub type MirrorResult<T> = Result<MirrorOutcome<T>, DomainError>;

// ============================================================================
// Message Source
// ============================================================================

/// Where starred messages come from
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch a message by channel and id
    ///
    /// Returns `DomainError::MessageNotFound` if it no longer exists.
    async fn fetch_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RepoResult<Message>;

    /// Current number of `emoji` reactions on the message (0 if absent)
    async fn fetch_reaction_count(&self, message: &Message, emoji: &str) -> RepoResult<u32>;

    /// Resolve the channel the message lives in, plus its parent for threads
    async fn get_location(&self, message: &Message) -> RepoResult<MessageLocation>;
}

// ============================================================================
// Mirror Sink
// ============================================================================

/// Where mirrored posts are written
#[async_trait]
pub trait MirrorSink: Send + Sync {
    /// Create a post in `destination`, returning its id
    async fn send(&self, destination: Snowflake, post: &MirrorPost) -> MirrorResult<Snowflake>;

    /// Overwrite an existing post
    async fn edit(
        &self,
        destination: Snowflake,
        mirrored_id: Snowflake,
        post: &MirrorPost,
    ) -> MirrorResult<()>;

    /// Delete an existing post
    async fn delete(&self, destination: Snowflake, mirrored_id: Snowflake) -> MirrorResult<()>;
}

// ============================================================================
// Metrics Sink
// ============================================================================

/// Fire-and-forget observability hooks
pub trait MetricsSink: Send + Sync {
    /// A star reaction was added to an eligible message
    fn record_reaction_added(&self);

    /// A star reaction was removed from an eligible message
    fn record_reaction_removed(&self);

    /// A reconciliation finished (whatever branch it took)
    fn record_reconciliation(&self, duration: Duration);

    /// A mapping-store operation finished
    fn record_store_operation(&self, duration: Duration);
}

/// Metrics sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_reaction_added(&self) {}

    fn record_reaction_removed(&self) {}

    fn record_reconciliation(&self, _duration: Duration) {}

    fn record_store_operation(&self, _duration: Duration) {}
}
