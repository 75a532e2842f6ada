//! Permission bitflags for the Discord permission integer
//!
//! Only the bits the starboard inspects are named; unknown bits are kept
//! when parsing so a full permission integer round-trips.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Discord permission flags (bit positions match the Discord API)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        /// Bypass all permission checks
        const ADMINISTRATOR        = 1 << 3;
        /// Add emoji reactions
        const ADD_REACTIONS        = 1 << 6;
        /// View channel
        const VIEW_CHANNEL         = 1 << 10;
        /// Send messages in text channels
        const SEND_MESSAGES        = 1 << 11;
        /// Delete other users' messages
        const MANAGE_MESSAGES      = 1 << 13;
        /// Post links that render as embeds
        const EMBED_LINKS          = 1 << 14;
        /// Read message history
        const READ_MESSAGE_HISTORY = 1 << 16;

        /// What the bot needs in the starboard channel to create, edit and delete posts
        const STARBOARD_REQUIRED = Self::SEND_MESSAGES.bits()
            | Self::EMBED_LINKS.bits()
            | Self::MANAGE_MESSAGES.bits();

        const _ = !0;
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        self.contains(Permissions::ADMINISTRATOR) || self.contains(permission)
    }

    /// Permissions from `required` that this set lacks
    #[must_use]
    pub fn missing(&self, required: Permissions) -> Permissions {
        if self.contains(Permissions::ADMINISTRATOR) {
            return Permissions::empty();
        }
        required.difference(*self)
    }

    /// Parse from string representation (decimal number, as Discord sends it)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.trim().parse::<u64>().map(Permissions::from_bits_retain)
    }

    /// Names of the known permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names()
            .filter(|(name, _)| *name != "STARBOARD_REQUIRED")
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Permissions::parse(&s).map_err(serde::de::Error::custom)
    }
}
