//! Starboard mapping - original message to its mirrored post

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// One row per original message that currently has a mirrored post
///
/// No row means no mirrored post exists for that message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarboardMapping {
    pub original_message_id: Snowflake,
    pub mirrored_message_id: Snowflake,
    pub star_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl StarboardMapping {
    /// Create a new mapping stamped with the current time
    pub fn new(original_message_id: Snowflake, mirrored_message_id: Snowflake, star_count: u32) -> Self {
        Self {
            original_message_id,
            mirrored_message_id,
            star_count,
            updated_at: Utc::now(),
        }
    }

    /// Point the mapping at a (possibly new) mirrored post with a new count
    pub fn replace(&mut self, mirrored_message_id: Snowflake, star_count: u32) {
        self.mirrored_message_id = mirrored_message_id;
        self.star_count = star_count;
        self.updated_at = Utc::now();
    }
}
