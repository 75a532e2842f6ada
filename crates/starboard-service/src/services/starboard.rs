//! Starboard reconciliation
//!
//! Drives the mirrored post of one original message towards the state implied
//! by its current star count:
//!
//! | count       | mapping  | action                                   |
//! |-------------|----------|------------------------------------------|
//! | < threshold | none     | nothing                                  |
//! | < threshold | some(id) | delete post `id`, remove row             |
//! | ≥ threshold | none     | send post, insert row                    |
//! | ≥ threshold | some(id) | edit post `id` (send again if gone), upsert row |
//!
//! Not-found and forbidden answers from the mirror destination are logged and
//! absorbed. A message that disappears before its stars are counted is
//! abandoned without touching the store. Store failures are returned to the
//! caller.

use std::time::Instant;

use starboard_core::{
    Message, MirrorOutcome, MirrorPost, ReactionSnapshot, Snowflake, StarboardSettings,
};
use tracing::{debug, error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::render::render_post;

/// Whether a message currently has a mirrored post, as seen by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    /// No mapping row
    Unmirrored,
    /// A mapping row points at this mirrored post
    Mirrored(Snowflake),
}

impl From<Option<Snowflake>> for MirrorState {
    fn from(mapping: Option<Snowflake>) -> Self {
        mapping.map_or(Self::Unmirrored, Self::Mirrored)
    }
}

/// What a reconciliation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No mirror destination configured; nothing was touched
    NotConfigured,
    /// The message or its channel disappeared before the count was read
    Abandoned,
    /// Below threshold and never mirrored
    Unchanged,
    /// Dropped below threshold: post deleted (or already gone) and row removed
    Removed { mirrored_id: Snowflake },
    /// First time at threshold: post created and row inserted
    Created { mirrored_id: Snowflake },
    /// Existing post edited and row refreshed
    Updated { mirrored_id: Snowflake },
    /// Existing post could not be edited for lack of permission; row refreshed
    Retained { mirrored_id: Snowflake },
    /// Existing post was gone: a replacement was created and the row repointed
    Healed { stale_id: Snowflake, mirrored_id: Snowflake },
    /// The destination refused a new post; no row points at a post
    Refused,
}

impl ReconcileOutcome {
    /// The mirrored post the mapping now points at, if any
    pub fn mirrored_id(&self) -> Option<Snowflake> {
        match *self {
            Self::Created { mirrored_id }
            | Self::Updated { mirrored_id }
            | Self::Retained { mirrored_id }
            | Self::Healed { mirrored_id, .. } => Some(mirrored_id),
            Self::NotConfigured
            | Self::Abandoned
            | Self::Unchanged
            | Self::Removed { .. }
            | Self::Refused => None,
        }
    }

    /// Name for logging
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Abandoned => "abandoned",
            Self::Unchanged => "unchanged",
            Self::Removed { .. } => "removed",
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Retained { .. } => "retained",
            Self::Healed { .. } => "healed",
            Self::Refused => "refused",
        }
    }
}

/// Starboard service - the reconciler
pub struct StarboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StarboardService<'a> {
    /// Create a new StarboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Bring the mirrored post of `message` in line with its star count
    ///
    /// Idempotent: a second call with an unchanged count re-renders the same
    /// post and rewrites the same row.
    #[instrument(skip(self, message, settings), fields(message_id = %message.id))]
    pub async fn reconcile(
        &self,
        message: &Message,
        settings: &StarboardSettings,
    ) -> ServiceResult<ReconcileOutcome> {
        let Some(destination) = settings.starboard_channel_id else {
            error!(message_id = %message.id, "Starboard channel is not configured");
            return Ok(ReconcileOutcome::NotConfigured);
        };

        let started = Instant::now();
        let count = match self
            .ctx
            .message_source()
            .fetch_reaction_count(message, &settings.star_emoji)
            .await
        {
            Ok(count) => count,
            Err(e) if e.is_not_found() => {
                warn!(
                    message_id = %message.id,
                    error = %e,
                    "Message vanished before its stars could be counted"
                );
                return Ok(ReconcileOutcome::Abandoned);
            }
            Err(e) => return Err(e.into()),
        };

        let result = self.apply(message, settings, destination, count).await;
        self.ctx.metrics().record_reconciliation(started.elapsed());

        if let Ok(outcome) = &result {
            debug!(message_id = %message.id, outcome = outcome.label(), "Reconciled");
        }
        result
    }

    async fn apply(
        &self,
        message: &Message,
        settings: &StarboardSettings,
        destination: Snowflake,
        count: u32,
    ) -> ServiceResult<ReconcileOutcome> {
        let snapshot = ReactionSnapshot::new(message.id, count);
        let state = MirrorState::from(self.ctx.mapping_repo().get(message.id).await?);

        info!(message_id = %message.id, star_count = count, ?state, "Star count read");

        if !snapshot.reaches(settings.star_threshold) {
            return match state {
                MirrorState::Unmirrored => Ok(ReconcileOutcome::Unchanged),
                MirrorState::Mirrored(mirrored_id) => {
                    self.take_down(message.id, destination, mirrored_id).await
                }
            };
        }

        let post = render_post(message, count, &settings.star_emoji);
        match state {
            MirrorState::Unmirrored => self.publish(message.id, destination, &post, count).await,
            MirrorState::Mirrored(mirrored_id) => {
                self.refresh(message.id, destination, mirrored_id, &post, count)
                    .await
            }
        }
    }

    /// Below threshold with a live mapping: delete the post, drop the row
    async fn take_down(
        &self,
        message_id: Snowflake,
        destination: Snowflake,
        mirrored_id: Snowflake,
    ) -> ServiceResult<ReconcileOutcome> {
        match self.ctx.mirror_sink().delete(destination, mirrored_id).await? {
            MirrorOutcome::Applied(()) => {
                info!(message_id = %message_id, mirrored_id = %mirrored_id, "Starboard post deleted");
            }
            MirrorOutcome::NotFound => {
                warn!(message_id = %message_id, mirrored_id = %mirrored_id, "Starboard post already gone");
            }
            MirrorOutcome::Forbidden => {
                warn!(
                    message_id = %message_id,
                    mirrored_id = %mirrored_id,
                    "No permission to delete starboard post"
                );
            }
        }

        self.ctx.mapping_repo().remove(message_id).await?;
        Ok(ReconcileOutcome::Removed { mirrored_id })
    }

    /// At threshold without a mapping: create the post, insert the row
    async fn publish(
        &self,
        message_id: Snowflake,
        destination: Snowflake,
        post: &MirrorPost,
        count: u32,
    ) -> ServiceResult<ReconcileOutcome> {
        match self.send(message_id, destination, post).await? {
            Some(mirrored_id) => {
                self.ctx
                    .mapping_repo()
                    .upsert(message_id, mirrored_id, count)
                    .await?;
                info!(message_id = %message_id, mirrored_id = %mirrored_id, star_count = count, "Starboard post created");
                Ok(ReconcileOutcome::Created { mirrored_id })
            }
            None => Ok(ReconcileOutcome::Refused),
        }
    }

    /// At threshold with a mapping: edit in place, heal if the post vanished
    async fn refresh(
        &self,
        message_id: Snowflake,
        destination: Snowflake,
        mirrored_id: Snowflake,
        post: &MirrorPost,
        count: u32,
    ) -> ServiceResult<ReconcileOutcome> {
        let edited = self
            .ctx
            .mirror_sink()
            .edit(destination, mirrored_id, post)
            .await?;

        match edited {
            MirrorOutcome::Applied(()) => {
                self.ctx
                    .mapping_repo()
                    .upsert(message_id, mirrored_id, count)
                    .await?;
                info!(message_id = %message_id, mirrored_id = %mirrored_id, star_count = count, "Starboard post updated");
                Ok(ReconcileOutcome::Updated { mirrored_id })
            }
            MirrorOutcome::Forbidden => {
                warn!(
                    message_id = %message_id,
                    mirrored_id = %mirrored_id,
                    "No permission to edit starboard post, keeping mapping"
                );
                self.ctx
                    .mapping_repo()
                    .upsert(message_id, mirrored_id, count)
                    .await?;
                Ok(ReconcileOutcome::Retained { mirrored_id })
            }
            MirrorOutcome::NotFound => {
                warn!(
                    message_id = %message_id,
                    stale_id = %mirrored_id,
                    "Starboard post missing, creating a replacement"
                );
                match self.send(message_id, destination, post).await? {
                    Some(new_id) => {
                        self.ctx
                            .mapping_repo()
                            .upsert(message_id, new_id, count)
                            .await?;
                        info!(message_id = %message_id, mirrored_id = %new_id, star_count = count, "Starboard post recreated");
                        Ok(ReconcileOutcome::Healed {
                            stale_id: mirrored_id,
                            mirrored_id: new_id,
                        })
                    }
                    None => {
                        self.ctx.mapping_repo().remove(message_id).await?;
                        Ok(ReconcileOutcome::Refused)
                    }
                }
            }
        }
    }

    /// Send a post; `None` if the destination refused it
    async fn send(
        &self,
        message_id: Snowflake,
        destination: Snowflake,
        post: &MirrorPost,
    ) -> ServiceResult<Option<Snowflake>> {
        let outcome = self.ctx.mirror_sink().send(destination, post).await?;
        if !outcome.is_applied() {
            warn!(
                message_id = %message_id,
                destination = %destination,
                outcome = outcome.label(),
                "Starboard channel refused the post"
            );
        }
        Ok(outcome.applied())
    }
}
