//! Discord REST adapter
//!
//! Implements the message source and the mirror sink on top of the Discord
//! HTTP API.

mod client;
mod error;
mod models;
mod permissions;

pub use client::{DiscordHttp, RestOutcome};
pub use error::HttpError;
pub use models::{
    ChannelModel, CreateMessageBody, EmbedFieldModel, EmbedFooterModel, EmbedModel, MemberModel,
    MessageModel, OverwriteModel, ReactionModel, RoleModel, UserModel,
};
pub use permissions::compute_channel_permissions;
