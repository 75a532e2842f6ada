//! Business logic services
//!
//! Services borrow a `ServiceContext` and are created per call:
//!
//! ```rust,ignore
//! let outcome = StarboardService::new(&ctx).reconcile(&message, &settings).await?;
//! ```

pub mod context;
pub mod eligibility;
pub mod error;
pub mod locks;
pub mod reaction;
pub mod render;
pub mod settings;
pub mod starboard;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use eligibility::is_eligible;
pub use error::{ServiceError, ServiceResult};
pub use locks::MessageLocks;
pub use reaction::{ReactionOutcome, ReactionService};
pub use render::render_post;
pub use settings::{SettingsService, StarboardChannelUpdate};
pub use starboard::{MirrorState, ReconcileOutcome, StarboardService};
