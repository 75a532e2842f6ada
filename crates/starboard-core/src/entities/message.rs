//! Message entity - a message as seen by the starboard

use crate::entities::reaction::ReactionCount;
use crate::value_objects::Snowflake;

/// Message author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Snowflake,
    pub username: String,
}

impl Author {
    /// Create a new Author
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }

    /// User mention markup (`<@id>`)
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Message entity
///
/// Carries the reaction counts that were attached when the message was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: Author,
    pub content: String,
    pub reactions: Vec<ReactionCount>,
}

impl Message {
    /// Create a new Message without reactions
    pub fn new(id: Snowflake, channel_id: Snowflake, author: Author, content: impl Into<String>) -> Self {
        Self {
            id,
            channel_id,
            guild_id: None,
            author,
            content: content.into(),
            reactions: Vec::new(),
        }
    }

    /// Set the guild
    #[must_use]
    pub fn in_guild(mut self, guild_id: Snowflake) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    /// Replace the reaction counts
    #[must_use]
    pub fn with_reactions(mut self, reactions: Vec<ReactionCount>) -> Self {
        self.reactions = reactions;
        self
    }

    /// Number of reactions with the given emoji (0 if nobody reacted with it)
    pub fn reaction_count(&self, emoji: &str) -> u32 {
        self.reactions
            .iter()
            .find(|r| r.is_emoji(emoji))
            .map_or(0, |r| r.count)
    }

    /// Link that opens the message in a Discord client
    #[must_use]
    pub fn jump_url(&self) -> String {
        let guild = self
            .guild_id
            .map_or_else(|| "@me".to_string(), |id| id.to_string());
        format!(
            "https://discord.com/channels/{guild}/{}/{}",
            self.channel_id, self.id
        )
    }

    /// Get a truncated preview of the message content
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}
