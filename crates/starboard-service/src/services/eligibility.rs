//! Which messages the starboard watches

use starboard_core::{MessageLocation, StarboardSettings};

/// Check if a message at `location` belongs to the monitored forum
///
/// True only for messages inside a thread whose parent is the configured forum
/// channel, and only if that parent really is a forum. Posts made directly in
/// a channel, orphaned threads and an unconfigured forum all yield false.
pub fn is_eligible(location: &MessageLocation, settings: &StarboardSettings) -> bool {
    let Some(forum_id) = settings.forum_channel_id else {
        return false;
    };
    if !location.channel.is_thread() {
        return false;
    }

    location
        .parent
        .as_ref()
        .is_some_and(|parent| parent.id == forum_id && parent.is_forum())
}
