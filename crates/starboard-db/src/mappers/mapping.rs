//! Starboard mapping entity <-> model mapper

use starboard_core::{Snowflake, StarboardMapping};

use crate::models::StarboardMappingModel;

/// Convert StarboardMappingModel to StarboardMapping entity
impl From<StarboardMappingModel> for StarboardMapping {
    fn from(model: StarboardMappingModel) -> Self {
        StarboardMapping {
            original_message_id: Snowflake::new(model.message_id),
            mirrored_message_id: Snowflake::new(model.starboard_message_id),
            // Only non-negative counts are ever written
            star_count: u32::try_from(model.stars).unwrap_or(0),
            updated_at: model.updated_at,
        }
    }
}

/// Column values for an insert-or-update of one mapping row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingUpsert {
    pub message_id: i64,
    pub starboard_message_id: i64,
    pub stars: i32,
}

impl MappingUpsert {
    pub fn new(original_id: Snowflake, mirrored_id: Snowflake, star_count: u32) -> Self {
        Self {
            message_id: original_id.into_inner(),
            starboard_message_id: mirrored_id.into_inner(),
            stars: i32::try_from(star_count).unwrap_or(i32::MAX),
        }
    }
}
