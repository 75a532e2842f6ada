//! Starboard settings - the configuration value each reconciliation reads

use crate::value_objects::Snowflake;

/// Default number of stars needed to reach the starboard
pub const DEFAULT_STAR_THRESHOLD: u32 = 3;

/// Default star emoji
pub const DEFAULT_STAR_EMOJI: &str = "⭐";

/// Snapshot of the runtime-mutable starboard configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarboardSettings {
    /// Forum whose threads are monitored
    pub forum_channel_id: Option<Snowflake>,
    /// Channel receiving the mirrored posts
    pub starboard_channel_id: Option<Snowflake>,
    pub star_threshold: u32,
    pub star_emoji: String,
}

impl Default for StarboardSettings {
    fn default() -> Self {
        Self {
            forum_channel_id: None,
            starboard_channel_id: None,
            star_threshold: DEFAULT_STAR_THRESHOLD,
            star_emoji: DEFAULT_STAR_EMOJI.to_string(),
        }
    }
}

impl StarboardSettings {
    /// Settings for a fully configured starboard
    pub fn new(forum_channel_id: Snowflake, starboard_channel_id: Snowflake, star_threshold: u32) -> Self {
        Self {
            forum_channel_id: Some(forum_channel_id),
            starboard_channel_id: Some(starboard_channel_id),
            star_threshold,
            ..Self::default()
        }
    }

    /// Check if both channels are set
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.forum_channel_id.is_some() && self.starboard_channel_id.is_some()
    }
}
