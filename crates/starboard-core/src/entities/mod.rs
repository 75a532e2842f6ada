//! Domain entities - core business objects

mod channel;
mod mapping;
mod message;
mod mirror;
mod reaction;
mod settings;

pub use channel::{Channel, ChannelKind, MessageLocation};
pub use mapping::StarboardMapping;
pub use message::{Author, Message};
pub use mirror::{Embed, EmbedField, MirrorOutcome, MirrorPost};
pub use reaction::{ReactionCount, ReactionEvent, ReactionEventKind, ReactionSnapshot};
pub use settings::{StarboardSettings, DEFAULT_STAR_EMOJI, DEFAULT_STAR_THRESHOLD};
