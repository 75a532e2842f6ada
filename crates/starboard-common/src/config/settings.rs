//! Shared, runtime-mutable starboard settings

use std::sync::Arc;

use parking_lot::RwLock;
use starboard_core::{Snowflake, StarboardSettings};

/// Cheaply cloneable handle to the live starboard settings
///
/// Readers take a `snapshot()` at the start of each reconciliation; writers
/// are the administrative operations. A reconciliation already in flight keeps
/// the values it started with.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<StarboardSettings>>,
}

impl SettingsHandle {
    /// Create a handle with initial settings
    #[must_use]
    pub fn new(settings: StarboardSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the current settings
    #[must_use]
    pub fn snapshot(&self) -> StarboardSettings {
        self.inner.read().clone()
    }

    /// Set the star threshold
    pub fn set_threshold(&self, threshold: u32) {
        self.inner.write().star_threshold = threshold;
    }

    /// Set the monitored forum
    pub fn set_forum_channel(&self, channel_id: Snowflake) {
        self.inner.write().forum_channel_id = Some(channel_id);
    }

    /// Set the mirror destination
    pub fn set_starboard_channel(&self, channel_id: Snowflake) {
        self.inner.write().starboard_channel_id = Some(channel_id);
    }
}
