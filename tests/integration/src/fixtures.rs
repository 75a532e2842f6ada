//! Test fixtures and data generators
//!
//! A small guild with one monitored forum, a thread inside it, a second forum,
//! a plain text channel and the starboard channel.

use std::sync::atomic::{AtomicI64, Ordering};

use starboard_core::{
    Author, Channel, ChannelKind, Message, ReactionEvent, ReactionEventKind, Snowflake,
    StarboardSettings, DEFAULT_STAR_EMOJI,
};

pub const GUILD_ID: Snowflake = Snowflake::new(1);
pub const FORUM_ID: Snowflake = Snowflake::new(100);
pub const STARBOARD_ID: Snowflake = Snowflake::new(200);
pub const THREAD_ID: Snowflake = Snowflake::new(300);
pub const TEXT_ID: Snowflake = Snowflake::new(400);
pub const OTHER_FORUM_ID: Snowflake = Snowflake::new(500);
pub const OTHER_THREAD_ID: Snowflake = Snowflake::new(600);
pub const AUTHOR_ID: Snowflake = Snowflake::new(42);
pub const REACTOR_ID: Snowflake = Snowflake::new(43);

/// Counter for unique message ids
static COUNTER: AtomicI64 = AtomicI64::new(10_000);

/// Get a unique message id
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Monitored forum
pub fn forum() -> Channel {
    Channel::new(FORUM_ID, ChannelKind::GuildForum)
        .in_guild(GUILD_ID)
        .named("showcase")
}

/// Thread inside the monitored forum
pub fn thread() -> Channel {
    Channel::new(THREAD_ID, ChannelKind::PublicThread)
        .in_guild(GUILD_ID)
        .named("my-project")
        .with_parent(FORUM_ID)
}

/// A forum that is not monitored
pub fn other_forum() -> Channel {
    Channel::new(OTHER_FORUM_ID, ChannelKind::GuildForum)
        .in_guild(GUILD_ID)
        .named("questions")
}

/// Thread inside the forum that is not monitored
pub fn other_thread() -> Channel {
    Channel::new(OTHER_THREAD_ID, ChannelKind::PublicThread)
        .in_guild(GUILD_ID)
        .named("help")
        .with_parent(OTHER_FORUM_ID)
}

/// Plain text channel
pub fn text_channel() -> Channel {
    Channel::new(TEXT_ID, ChannelKind::GuildText)
        .in_guild(GUILD_ID)
        .named("general")
}

/// Channel receiving mirrored posts
pub fn starboard_channel() -> Channel {
    Channel::new(STARBOARD_ID, ChannelKind::GuildText)
        .in_guild(GUILD_ID)
        .named("starboard")
}

/// Every channel of the test guild
pub fn guild_channels() -> Vec<Channel> {
    vec![
        forum(),
        thread(),
        other_forum(),
        other_thread(),
        text_channel(),
        starboard_channel(),
    ]
}

/// Fully configured settings with the given threshold
pub fn settings(threshold: u32) -> StarboardSettings {
    StarboardSettings::new(FORUM_ID, STARBOARD_ID, threshold)
}

/// Author of every test message
pub fn author() -> Author {
    Author::new(AUTHOR_ID, "ferris")
}

/// A fresh message in `channel_id`
pub fn message_in(channel_id: Snowflake, content: &str) -> Message {
    Message::new(unique_id(), channel_id, author(), content).in_guild(GUILD_ID)
}

/// A fresh message in the monitored thread
pub fn thread_message(content: &str) -> Message {
    message_in(THREAD_ID, content)
}

/// Reaction notification for `message` with an arbitrary emoji
pub fn reaction_event(kind: ReactionEventKind, message: &Message, emoji: &str) -> ReactionEvent {
    ReactionEvent {
        kind,
        user_id: REACTOR_ID,
        channel_id: message.channel_id,
        message_id: message.id,
        guild_id: message.guild_id,
        emoji: emoji.to_string(),
    }
}

/// Star reaction notification for `message`
pub fn star_event(kind: ReactionEventKind, message: &Message) -> ReactionEvent {
    reaction_event(kind, message, DEFAULT_STAR_EMOJI)
}
