//! Gateway intents - which event groups the bot subscribes to

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Gateway intent flags (bit positions match the Discord API)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        const GUILDS                  = 1 << 0;
        const GUILD_MESSAGES          = 1 << 9;
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        /// Privileged; must be enabled for the application
        const MESSAGE_CONTENT         = 1 << 15;
    }
}

impl Intents {
    /// Everything the starboard needs: channel info, reactions, message text
    pub const STARBOARD: Self = Self::GUILDS
        .union(Self::GUILD_MESSAGES)
        .union(Self::GUILD_MESSAGE_REACTIONS)
        .union(Self::MESSAGE_CONTENT);
}

impl Default for Intents {
    fn default() -> Self {
        Self::STARBOARD
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self::from_bits_retain)
    }
}
