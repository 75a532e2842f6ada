//! Channel entity - text channels, forums, and the threads inside them

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Channel kind, using the numeric channel types of the Discord API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelKind {
    /// Guild text channel
    #[default]
    GuildText,
    /// Direct message between users
    Dm,
    /// Guild category for organizing channels
    GuildCategory,
    /// Announcement (news) channel
    GuildAnnouncement,
    /// Thread inside an announcement channel
    AnnouncementThread,
    /// Public thread (forum posts are public threads)
    PublicThread,
    /// Private thread
    PrivateThread,
    /// Forum channel; every post is a thread
    GuildForum,
    /// Media channel
    GuildMedia,
    /// Voice, stage, directory, or anything newer we do not model
    Other(u8),
}

impl ChannelKind {
    /// Get the numeric value
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::GuildText => 0,
            Self::Dm => 1,
            Self::GuildCategory => 4,
            Self::GuildAnnouncement => 5,
            Self::AnnouncementThread => 10,
            Self::PublicThread => 11,
            Self::PrivateThread => 12,
            Self::GuildForum => 15,
            Self::GuildMedia => 16,
            Self::Other(value) => value,
        }
    }

    /// Check if this kind is a thread
    #[inline]
    #[must_use]
    pub fn is_thread(self) -> bool {
        matches!(
            self,
            Self::AnnouncementThread | Self::PublicThread | Self::PrivateThread
        )
    }

    /// Check if this kind is a forum
    #[inline]
    #[must_use]
    pub fn is_forum(self) -> bool {
        matches!(self, Self::GuildForum)
    }

    /// Check if plain messages (and therefore starboard posts) can be sent here
    #[inline]
    #[must_use]
    pub fn accepts_messages(self) -> bool {
        matches!(self, Self::GuildText | Self::GuildAnnouncement | Self::Dm) || self.is_thread()
    }
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            4 => Self::GuildCategory,
            5 => Self::GuildAnnouncement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            15 => Self::GuildForum,
            16 => Self::GuildMedia,
            other => Self::Other(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        kind.as_u8()
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub kind: ChannelKind,
    /// Category for regular channels, containing channel for threads
    pub parent_id: Option<Snowflake>,
}

impl Channel {
    /// Create a new channel
    #[must_use]
    pub fn new(id: Snowflake, kind: ChannelKind) -> Self {
        Self {
            id,
            guild_id: None,
            name: None,
            kind,
            parent_id: None,
        }
    }

    /// Set the guild
    #[must_use]
    pub fn in_guild(mut self, guild_id: Snowflake) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    /// Set the display name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the parent channel
    #[must_use]
    pub fn with_parent(mut self, parent_id: Snowflake) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Check if this channel is a thread
    #[inline]
    #[must_use]
    pub fn is_thread(&self) -> bool {
        self.kind.is_thread()
    }

    /// Check if this channel is a forum
    #[inline]
    #[must_use]
    pub fn is_forum(&self) -> bool {
        self.kind.is_forum()
    }

    /// Channel mention markup (`<#id>`)
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }

    /// Get display name (channel name or the raw id)
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Where a message lives: its channel and, for threads, the containing channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLocation {
    pub channel: Channel,
    pub parent: Option<Channel>,
}

impl MessageLocation {
    /// Location of a message posted directly in a channel
    #[must_use]
    pub fn direct(channel: Channel) -> Self {
        Self {
            channel,
            parent: None,
        }
    }

    /// Location of a message posted in a thread
    #[must_use]
    pub fn in_thread(thread: Channel, parent: Option<Channel>) -> Self {
        Self {
            channel: thread,
            parent,
        }
    }
}
