//! Discord REST API client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use starboard_common::DiscordConfig;
use starboard_core::{
    DomainError, Message, MessageLocation, MessageSource, MirrorOutcome, MirrorPost,
    MirrorResult, MirrorSink, Permissions, RepoResult, Snowflake,
};

use super::error::HttpError;
use super::models::{
    ChannelModel, CreateMessageBody, MemberModel, MessageModel, RoleModel, UserModel,
};
use super::permissions::compute_channel_permissions;

/// Result of a REST call: 403/404 as outcomes, everything else fatal
pub type RestOutcome<T> = Result<MirrorOutcome<T>, HttpError>;

/// Attempts per request when Discord answers 429
const MAX_ATTEMPTS: u32 = 3;

/// Used when a 429 response carries no usable `retry_after`
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: Snowflake,
}

/// Discord REST client
///
/// Guild channels (forums, text channels) are cached for the lifetime of the
/// client; their kind does not change while they exist. Threads come and go
/// and are always fetched.
#[derive(Clone)]
pub struct DiscordHttp {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    channels: Arc<DashMap<Snowflake, ChannelModel>>,
}

impl DiscordHttp {
    /// Create a new client from the Discord config section
    pub fn new(config: &DiscordConfig) -> Result<Self, HttpError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!(
                "DiscordBot (",
                env!("CARGO_PKG_NAME"),
                ", ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            channels: Arc::new(DashMap::new()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, waiting out rate limits
    async fn execute<F>(&self, route: &str, build: F) -> RestOutcome<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            let response = build(&self.http_client)
                .header(AUTHORIZATION, format!("Bot {}", self.token))
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => return Ok(MirrorOutcome::Applied(response)),
                StatusCode::NOT_FOUND => return Ok(MirrorOutcome::NotFound),
                StatusCode::FORBIDDEN => return Ok(MirrorOutcome::Forbidden),
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after(response).await;
                    warn!(
                        route,
                        attempt,
                        retry_after_ms = retry_after.as_millis() as u64,
                        "Rate limited by Discord"
                    );
                    match retry_delay(attempt, retry_after) {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => break,
                    }
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(HttpError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
            }
        }

        Err(HttpError::RateLimited {
            route: route.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    async fn get_json<T>(&self, route: &str, path: String) -> RestOutcome<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(&path);
        match self.execute(route, |c| c.get(&url)).await? {
            MirrorOutcome::Applied(response) => {
                let value = response
                    .json::<T>()
                    .await
                    .map_err(|e| HttpError::Decode(e.to_string()))?;
                Ok(MirrorOutcome::Applied(value))
            }
            MirrorOutcome::NotFound => Ok(MirrorOutcome::NotFound),
            MirrorOutcome::Forbidden => Ok(MirrorOutcome::Forbidden),
        }
    }

    // === Channels ===

    /// Get a channel, from the cache when possible
    #[instrument(skip(self))]
    pub async fn get_channel(&self, channel_id: Snowflake) -> RestOutcome<ChannelModel> {
        if let Some(cached) = self.channels.get(&channel_id) {
            return Ok(MirrorOutcome::Applied(cached.clone()));
        }

        let outcome = self
            .get_json::<ChannelModel>("GET /channels/{channel}", format!("/channels/{channel_id}"))
            .await?;
        if let MirrorOutcome::Applied(channel) = &outcome {
            if is_cacheable(channel) {
                self.channels.insert(channel_id, channel.clone());
            }
        }
        Ok(outcome)
    }

    // === Messages ===

    /// Get a single message
    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestOutcome<MessageModel> {
        self.get_json(
            "GET /channels/{channel}/messages/{message}",
            format!("/channels/{channel_id}/messages/{message_id}"),
        )
        .await
    }

    /// Post a message, returning its id
    #[instrument(skip(self, body))]
    pub async fn create_message(
        &self,
        channel_id: Snowflake,
        body: &CreateMessageBody,
    ) -> RestOutcome<Snowflake> {
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let outcome = self
            .execute("POST /channels/{channel}/messages", |c| c.post(&url).json(body))
            .await?;

        match outcome {
            MirrorOutcome::Applied(response) => {
                let created = response
                    .json::<CreatedMessage>()
                    .await
                    .map_err(|e| HttpError::Decode(e.to_string()))?;
                Ok(MirrorOutcome::Applied(created.id))
            }
            MirrorOutcome::NotFound => Ok(MirrorOutcome::NotFound),
            MirrorOutcome::Forbidden => Ok(MirrorOutcome::Forbidden),
        }
    }

    /// Replace the content and embeds of a message
    #[instrument(skip(self, body))]
    pub async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        body: &CreateMessageBody,
    ) -> RestOutcome<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));
        let outcome = self
            .execute("PATCH /channels/{channel}/messages/{message}", |c| {
                c.patch(&url).json(body)
            })
            .await?;
        Ok(discard(outcome))
    }

    /// Delete a message
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RestOutcome<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));
        let outcome = self
            .execute("DELETE /channels/{channel}/messages/{message}", |c| {
                c.delete(&url)
            })
            .await?;
        Ok(discard(outcome))
    }

    // === Users, Guilds, Permissions ===

    /// The bot's own user
    pub async fn current_user(&self) -> Result<UserModel, HttpError> {
        required(
            self.get_json("GET /users/@me", "/users/@me".to_string())
                .await?,
            "current user",
        )
    }

    /// The bot's effective permissions in a guild channel
    ///
    /// DM channels and channels the bot cannot see yield empty permissions.
    #[instrument(skip(self))]
    pub async fn channel_permissions(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<Permissions, HttpError> {
        let Some(channel) = self.get_channel(channel_id).await?.applied() else {
            return Ok(Permissions::empty());
        };
        let Some(guild_id) = channel.guild_id else {
            return Ok(Permissions::empty());
        };

        let roles: Vec<RoleModel> = required(
            self.get_json("GET /guilds/{guild}/roles", format!("/guilds/{guild_id}/roles"))
                .await?,
            "guild roles",
        )?;
        let member: MemberModel = required(
            self.get_json(
                "GET /guilds/{guild}/members/{user}",
                format!("/guilds/{guild_id}/members/{user_id}"),
            )
            .await?,
            "guild member",
        )?;

        Ok(compute_channel_permissions(
            guild_id,
            user_id,
            &member.roles,
            &roles,
            &channel.permission_overwrites,
        ))
    }
}

impl std::fmt::Debug for DiscordHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordHttp")
            .field("base_url", &self.base_url)
            .field("cached_channels", &self.channels.len())
            .finish_non_exhaustive()
    }
}

/// Wait before the next attempt, or `None` once the attempts are used up
fn retry_delay(attempt: u32, retry_after: Duration) -> Option<Duration> {
    (attempt < MAX_ATTEMPTS).then_some(retry_after)
}

fn is_cacheable(channel: &ChannelModel) -> bool {
    !channel.kind.is_thread()
}

fn discard(outcome: MirrorOutcome<Response>) -> MirrorOutcome<()> {
    match outcome {
        MirrorOutcome::Applied(_) => MirrorOutcome::Applied(()),
        MirrorOutcome::NotFound => MirrorOutcome::NotFound,
        MirrorOutcome::Forbidden => MirrorOutcome::Forbidden,
    }
}

fn required<T>(outcome: MirrorOutcome<T>, what: &str) -> Result<T, HttpError> {
    let label = outcome.label();
    outcome
        .applied()
        .ok_or_else(|| HttpError::Decode(format!("{what} unavailable ({label})")))
}

async fn retry_after(response: Response) -> Duration {
    response
        .json::<RateLimitBody>()
        .await
        .ok()
        .filter(|body| body.retry_after.is_finite() && body.retry_after >= 0.0)
        .map_or(DEFAULT_RETRY_AFTER, |body| {
            Duration::from_secs_f64(body.retry_after)
        })
}

// ============================================================================
// Message Source
// ============================================================================

#[async_trait]
impl MessageSource for DiscordHttp {
    async fn fetch_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RepoResult<Message> {
        let guild_id = self
            .get_channel(channel_id)
            .await?
            .applied()
            .and_then(|c| c.guild_id);

        match self.get_message(channel_id, message_id).await? {
            MirrorOutcome::Applied(model) => Ok(model.into_message(guild_id)),
            MirrorOutcome::NotFound | MirrorOutcome::Forbidden => {
                Err(DomainError::MessageNotFound(message_id))
            }
        }
    }

    /// Re-reads the message so the count is never older than this call
    async fn fetch_reaction_count(&self, message: &Message, emoji: &str) -> RepoResult<u32> {
        match self.get_message(message.channel_id, message.id).await? {
            MirrorOutcome::Applied(model) => Ok(model
                .reactions
                .iter()
                .filter(|r| r.emoji.as_text() == emoji)
                .map(|r| r.count)
                .sum()),
            MirrorOutcome::NotFound | MirrorOutcome::Forbidden => {
                Err(DomainError::MessageNotFound(message.id))
            }
        }
    }

    async fn get_location(&self, message: &Message) -> RepoResult<MessageLocation> {
        let channel = match self.get_channel(message.channel_id).await? {
            MirrorOutcome::Applied(model) => starboard_core::Channel::from(model),
            MirrorOutcome::NotFound | MirrorOutcome::Forbidden => {
                return Err(DomainError::ChannelNotFound(message.channel_id));
            }
        };

        if !channel.is_thread() {
            return Ok(MessageLocation::direct(channel));
        }

        let parent = match channel.parent_id {
            Some(parent_id) => self
                .get_channel(parent_id)
                .await?
                .applied()
                .map(starboard_core::Channel::from),
            None => None,
        };
        if parent.is_none() {
            debug!(channel_id = %channel.id, "Thread parent unavailable");
        }
        Ok(MessageLocation::in_thread(channel, parent))
    }
}

// ============================================================================
// Mirror Sink
// ============================================================================

#[async_trait]
impl MirrorSink for DiscordHttp {
    async fn send(&self, destination: Snowflake, post: &MirrorPost) -> MirrorResult<Snowflake> {
        Ok(self
            .create_message(destination, &CreateMessageBody::from(post))
            .await?)
    }

    async fn edit(
        &self,
        destination: Snowflake,
        mirrored_id: Snowflake,
        post: &MirrorPost,
    ) -> MirrorResult<()> {
        Ok(self
            .edit_message(destination, mirrored_id, &CreateMessageBody::from(post))
            .await?)
    }

    async fn delete(&self, destination: Snowflake, mirrored_id: Snowflake) -> MirrorResult<()> {
        Ok(self.delete_message(destination, mirrored_id).await?)
    }
}
