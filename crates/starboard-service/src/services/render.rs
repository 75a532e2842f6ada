//! Rendering a starred message into its mirrored post

use starboard_core::{Embed, EmbedField, Message, MirrorPost};

/// Embed accent color (gold)
pub const STARBOARD_COLOR: u32 = 0x00FF_D700;

/// Discord's limit on embed descriptions
const MAX_DESCRIPTION_LEN: usize = 4096;

/// Render the mirrored post for `message` at `count` stars
///
/// The output depends only on its inputs, so re-rendering an unchanged message
/// yields an identical post.
pub fn render_post(message: &Message, count: u32, emoji: &str) -> MirrorPost {
    let description = message.preview(MAX_DESCRIPTION_LEN);

    let embed = Embed {
        title: Some("Starred Message".to_string()),
        description: (!description.is_empty()).then(|| description.to_string()),
        url: Some(message.jump_url()),
        color: Some(STARBOARD_COLOR),
        fields: vec![
            EmbedField::inline("Author", message.author.mention()),
            EmbedField::inline("Stars", count.to_string()),
            EmbedField::inline("Channel", format!("<#{}>", message.channel_id)),
        ],
        footer: Some(format!("Message ID: {}", message.id)),
    };

    MirrorPost {
        content: format!("{emoji} {count}"),
        embed,
    }
}
