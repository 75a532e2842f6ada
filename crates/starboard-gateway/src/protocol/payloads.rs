//! Payload definitions
//!
//! The `d` field of the gateway messages the bot sends and reads.

use serde::{Deserialize, Serialize};
use starboard_core::{ReactionEvent, ReactionEventKind, Snowflake};

use super::Intents;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Bot token (without the `Bot ` prefix)
    pub token: String,
    pub intents: Intents,
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    /// Identify with the starboard intents and this process's properties
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents: Intents::STARBOARD,
            properties: IdentifyProperties::default(),
        }
    }

    /// Override the intents
    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    pub os: String,
    /// Library name
    pub browser: String,
    /// Library name
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: env!("CARGO_PKG_NAME").to_string(),
            device: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Payload for op 6 (Resume)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumePayload {
    pub token: String,
    pub session_id: String,
    /// Last sequence number received
    pub seq: u64,
}

/// `READY` dispatch payload (only the fields the bot uses)
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    /// URL to use when resuming this session
    pub resume_gateway_url: Option<String>,
    pub user: ReadyUser,
}

/// The bot's own user, from `READY`
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyUser {
    pub id: Snowflake,
    pub username: String,
}

/// Emoji as it appears in reaction dispatches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiPayload {
    /// Set for custom emojis only
    pub id: Option<Snowflake>,
    /// Unicode character, or the custom emoji's name
    pub name: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

impl EmojiPayload {
    /// Text form used for comparisons: the character itself, or `<:name:id>`
    /// (`<a:name:id>` when animated) for custom emojis
    pub fn as_text(&self) -> String {
        let name = self.name.as_deref().unwrap_or_default();
        match self.id {
            Some(id) if self.animated => format!("<a:{name}:{id}>"),
            Some(id) => format!("<:{name}:{id}>"),
            None => name.to_string(),
        }
    }
}

/// `MESSAGE_REACTION_ADD` / `MESSAGE_REACTION_REMOVE` dispatch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionPayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub emoji: EmojiPayload,
}

impl ReactionPayload {
    /// Convert into the domain event
    pub fn into_event(self, kind: ReactionEventKind) -> ReactionEvent {
        ReactionEvent {
            kind,
            user_id: self.user_id,
            channel_id: self.channel_id,
            message_id: self.message_id,
            guild_id: self.guild_id,
            emoji: self.emoji.as_text(),
        }
    }
}
