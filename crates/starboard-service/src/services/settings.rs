//! Settings service
//!
//! Administrative operations on the live starboard configuration.

use starboard_common::MonitorStats;
use starboard_core::{Channel, ChannelKind, DomainError, Permissions, StarboardSettings};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Result of pointing the starboard at a new channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarboardChannelUpdate {
    pub settings: StarboardSettings,
    /// Required permissions the bot lacks there; posting will be refused until fixed
    pub missing_permissions: Permissions,
}

impl StarboardChannelUpdate {
    /// Check if the bot can fully operate the new channel
    pub fn is_complete(&self) -> bool {
        self.missing_permissions.is_empty()
    }
}

/// Settings service
pub struct SettingsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SettingsService<'a> {
    /// Create a new SettingsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current settings
    pub fn current(&self) -> StarboardSettings {
        self.ctx.settings().snapshot()
    }

    /// Change the number of stars needed to reach the starboard
    #[instrument(skip(self))]
    pub fn set_threshold(&self, threshold: u32) -> ServiceResult<StarboardSettings> {
        if threshold == 0 {
            return Err(ServiceError::validation("Star threshold must be at least 1"));
        }

        self.ctx.settings().set_threshold(threshold);
        info!(threshold, "Star threshold changed");
        Ok(self.current())
    }

    /// Change the forum whose threads are monitored
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    pub fn set_forum_channel(&self, channel: &Channel) -> ServiceResult<StarboardSettings> {
        if !channel.is_forum() {
            return Err(DomainError::InvalidChannelKind {
                id: channel.id,
                expected: "forum",
                actual: channel.kind,
            }
            .into());
        }

        self.ctx.settings().set_forum_channel(channel.id);
        info!(channel = %channel.display_name(), "Starboard forum changed");
        Ok(self.current())
    }

    /// Change the channel that receives mirrored posts
    ///
    /// `bot_permissions` are the bot's effective permissions in `channel`.
    /// Missing permissions do not block the change; they are reported back.
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    pub fn set_starboard_channel(
        &self,
        channel: &Channel,
        bot_permissions: Permissions,
    ) -> ServiceResult<StarboardChannelUpdate> {
        if !matches!(channel.kind, ChannelKind::GuildText | ChannelKind::GuildAnnouncement) {
            return Err(DomainError::InvalidChannelKind {
                id: channel.id,
                expected: "text",
                actual: channel.kind,
            }
            .into());
        }

        self.ctx.settings().set_starboard_channel(channel.id);

        let missing_permissions = bot_permissions.missing(Permissions::STARBOARD_REQUIRED);
        if missing_permissions.is_empty() {
            info!(channel = %channel.display_name(), "Starboard channel changed");
        } else {
            warn!(
                channel = %channel.display_name(),
                missing = %missing_permissions.list().join(", "),
                "Starboard channel changed, but permissions are missing"
            );
        }

        Ok(StarboardChannelUpdate {
            settings: self.current(),
            missing_permissions,
        })
    }

    /// Monitor statistics
    pub fn stats(&self) -> MonitorStats {
        self.ctx.monitor().stats()
    }
}
