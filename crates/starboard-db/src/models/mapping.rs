//! Starboard mapping database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the starboard_mapping table
#[derive(Debug, Clone, FromRow)]
pub struct StarboardMappingModel {
    pub message_id: i64,
    pub starboard_message_id: i64,
    pub stars: i32,
    pub updated_at: DateTime<Utc>,
}
