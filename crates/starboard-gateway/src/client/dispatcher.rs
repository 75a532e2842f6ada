//! Hand-off from the gateway read loop to the reaction service

use starboard_core::ReactionEvent;
use starboard_service::{ReactionService, ServiceContext};
use tracing::{debug, error};

/// Receives reaction events from the gateway
///
/// `dispatch` must return promptly; the read loop calls it inline.
pub trait ReactionSink: Send + Sync {
    fn dispatch(&self, event: ReactionEvent);
}

/// Runs each event through `ReactionService` on its own task
#[derive(Debug, Clone)]
pub struct ServiceDispatcher {
    ctx: ServiceContext,
}

impl ServiceDispatcher {
    /// Create a new ServiceDispatcher
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }
}

impl ReactionSink for ServiceDispatcher {
    fn dispatch(&self, event: ReactionEvent) {
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            match ReactionService::new(&ctx).handle(&event).await {
                Ok(outcome) => {
                    debug!(message_id = %event.message_id, ?outcome, "Reaction event handled");
                }
                Err(e) => {
                    error!(
                        message_id = %event.message_id,
                        kind = event.kind.as_str(),
                        code = e.error_code(),
                        retryable = e.is_retryable(),
                        error = %e,
                        "Reaction event failed"
                    );
                }
            }
        });
    }
}
