//! Discord REST API models
//!
//! Wire shapes only; conversions into domain entities live next to them.

use serde::{Deserialize, Serialize};
use starboard_core::{
    Author, Channel, ChannelKind, Embed, EmbedField, Message, MirrorPost, Permissions,
    ReactionCount, Snowflake,
};

use crate::protocol::EmojiPayload;

/// Channel object (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelModel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub guild_id: Option<Snowflake>,
    pub name: Option<String>,
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub permission_overwrites: Vec<OverwriteModel>,
}

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: model.id,
            guild_id: model.guild_id,
            name: model.name,
            kind: model.kind,
            parent_id: model.parent_id,
        }
    }
}

/// Channel permission overwrite
#[derive(Debug, Clone, Deserialize)]
pub struct OverwriteModel {
    /// Role or member id
    pub id: Snowflake,
    /// 0 = role, 1 = member
    #[serde(rename = "type")]
    pub kind: u8,
    pub allow: Permissions,
    pub deny: Permissions,
}

impl OverwriteModel {
    pub const ROLE: u8 = 0;
    pub const MEMBER: u8 = 1;
}

/// User object (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct UserModel {
    pub id: Snowflake,
    pub username: String,
}

/// Reaction summary attached to a message
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionModel {
    pub count: u32,
    pub emoji: EmojiPayload,
}

/// Message object (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct MessageModel {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub author: UserModel,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub reactions: Vec<ReactionModel>,
}

impl MessageModel {
    /// Convert into the domain entity
    ///
    /// Message objects fetched over REST omit `guild_id`, so the channel's
    /// guild is passed in when known.
    pub fn into_message(self, guild_id: Option<Snowflake>) -> Message {
        let reactions = self
            .reactions
            .into_iter()
            .map(|r| ReactionCount::new(r.emoji.as_text(), r.count))
            .collect();

        let message = Message::new(
            self.id,
            self.channel_id,
            Author::new(self.author.id, self.author.username),
            self.content,
        )
        .with_reactions(reactions);

        match self.guild_id.or(guild_id) {
            Some(guild_id) => message.in_guild(guild_id),
            None => message,
        }
    }
}

/// Guild role (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct RoleModel {
    pub id: Snowflake,
    pub permissions: Permissions,
}

/// Guild member (subset)
#[derive(Debug, Clone, Deserialize)]
pub struct MemberModel {
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

/// Embed footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooterModel {
    pub text: String,
}

/// Embed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFieldModel {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Embed object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedFieldModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooterModel>,
}

impl From<&Embed> for EmbedModel {
    fn from(embed: &Embed) -> Self {
        Self {
            title: embed.title.clone(),
            description: embed.description.clone(),
            url: embed.url.clone(),
            color: embed.color,
            fields: embed.fields.iter().map(EmbedFieldModel::from).collect(),
            footer: embed
                .footer
                .clone()
                .map(|text| EmbedFooterModel { text }),
        }
    }
}

impl From<&EmbedField> for EmbedFieldModel {
    fn from(field: &EmbedField) -> Self {
        Self {
            name: field.name.clone(),
            value: field.value.clone(),
            inline: field.inline,
        }
    }
}

/// Body of create-message and edit-message requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMessageBody {
    pub content: String,
    pub embeds: Vec<EmbedModel>,
}

impl From<&MirrorPost> for CreateMessageBody {
    fn from(post: &MirrorPost) -> Self {
        Self {
            content: post.content.clone(),
            embeds: vec![EmbedModel::from(&post.embed)],
        }
    }
}
