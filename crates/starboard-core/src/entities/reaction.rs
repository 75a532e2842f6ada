//! Reaction types - aggregated counts, live snapshots, and change notifications

use crate::value_objects::Snowflake;

/// Aggregated reaction count for one emoji on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u32,
}

impl ReactionCount {
    /// Create a new ReactionCount
    pub fn new(emoji: impl Into<String>, count: u32) -> Self {
        Self {
            emoji: emoji.into(),
            count,
        }
    }

    /// Check if this count is for a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji: &str) -> bool {
        self.emoji == emoji
    }
}

/// Star count read from the source for one reconciliation
///
/// Never cached: reactions can change between two events for the same message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionSnapshot {
    pub message_id: Snowflake,
    pub count: u32,
}

impl ReactionSnapshot {
    /// Create a new snapshot
    pub fn new(message_id: Snowflake, count: u32) -> Self {
        Self { message_id, count }
    }

    /// Whether the count reaches the threshold
    #[inline]
    pub fn reaches(&self, threshold: u32) -> bool {
        self.count >= threshold
    }
}

/// Whether a reaction was added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionEventKind {
    Added,
    Removed,
}

impl ReactionEventKind {
    /// Get the kind name for logging
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

/// A reaction-change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub kind: ReactionEventKind,
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub emoji: String,
}

impl ReactionEvent {
    /// Check if the event concerns a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji: &str) -> bool {
        self.emoji == emoji
    }
}
