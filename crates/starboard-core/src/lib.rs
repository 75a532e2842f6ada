//! # starboard-core
//!
//! Domain layer containing entities, value objects, and the traits (ports) the
//! starboard needs from its collaborators: the mapping store, the message
//! source, the mirror sink, and the metrics sink.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Author, Channel, ChannelKind, Embed, EmbedField, Message, MessageLocation, MirrorOutcome,
    MirrorPost, ReactionCount, ReactionEvent, ReactionEventKind, ReactionSnapshot,
    StarboardMapping, StarboardSettings, DEFAULT_STAR_EMOJI, DEFAULT_STAR_THRESHOLD,
};
pub use error::DomainError;
pub use traits::{
    MappingRepository, MessageSource, MetricsSink, MirrorResult, MirrorSink, NoopMetrics,
    RepoResult,
};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
