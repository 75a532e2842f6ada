//! Reaction service
//!
//! Turns reaction-change notifications into reconciliations.

use starboard_core::{ReactionEvent, ReactionEventKind};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::eligibility::is_eligible;
use super::error::ServiceResult;
use super::starboard::{ReconcileOutcome, StarboardService};

/// What happened to one reaction notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Not the star emoji
    IgnoredEmoji,
    /// The message is outside the monitored forum
    NotEligible,
    /// The message or its channel could not be resolved; the store is untouched
    ///
    /// Also reported when the message vanishes between the fetch and the
    /// star count read.
    Abandoned,
    /// A reconciliation ran
    Reconciled(ReconcileOutcome),
}

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle one reaction add/remove notification
    ///
    /// Settings are read once, up front; an administrative change made while
    /// this runs applies from the next notification on.
    #[instrument(
        skip(self, event),
        fields(kind = event.kind.as_str(), message_id = %event.message_id, user_id = %event.user_id)
    )]
    pub async fn handle(&self, event: &ReactionEvent) -> ServiceResult<ReactionOutcome> {
        let settings = self.ctx.settings().snapshot();
        if !event.is_emoji(&settings.star_emoji) {
            return Ok(ReactionOutcome::IgnoredEmoji);
        }

        let source = self.ctx.message_source();
        let message = match source.fetch_message(event.channel_id, event.message_id).await {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    channel_id = %event.channel_id,
                    message_id = %event.message_id,
                    error = %e,
                    "Could not fetch message, dropping reaction event"
                );
                return Ok(ReactionOutcome::Abandoned);
            }
        };

        let location = match source.get_location(&message).await {
            Ok(location) => location,
            Err(e) => {
                warn!(
                    channel_id = %message.channel_id,
                    error = %e,
                    "Could not resolve channel, dropping reaction event"
                );
                return Ok(ReactionOutcome::Abandoned);
            }
        };

        if !is_eligible(&location, &settings) {
            debug!(channel_id = %message.channel_id, "Message is not in the starboard forum");
            return Ok(ReactionOutcome::NotEligible);
        }

        match event.kind {
            ReactionEventKind::Added => self.ctx.metrics().record_reaction_added(),
            ReactionEventKind::Removed => self.ctx.metrics().record_reaction_removed(),
        }

        let _guard = self.ctx.locks().acquire(message.id).await;
        let outcome = StarboardService::new(self.ctx)
            .reconcile(&message, &settings)
            .await?;

        Ok(match outcome {
            ReconcileOutcome::Abandoned => ReactionOutcome::Abandoned,
            outcome => ReactionOutcome::Reconciled(outcome),
        })
    }
}
