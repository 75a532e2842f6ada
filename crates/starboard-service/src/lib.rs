//! # starboard-service
//!
//! Application layer: deciding which messages are eligible, reconciling the
//! mirrored post of a message against its current star count, handling
//! reaction notifications, and the administrative settings operations.

pub mod services;

pub use services::{
    is_eligible, render_post, MessageLocks, MirrorState, ReactionService, ReactionOutcome,
    ReconcileOutcome, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SettingsService, StarboardChannelUpdate, StarboardService,
};
