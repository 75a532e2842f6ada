//! # starboard-gateway
//!
//! Discord-facing adapters and the bot runtime:
//!
//! - `protocol`: gateway op codes, envelope, payloads, close codes, intents
//! - `http`: REST client implementing the message source and mirror sink
//! - `client`: gateway connection loop and the hand-off to the services
//! - `bot`: wiring everything together from `AppConfig`

pub mod bot;
pub mod client;
pub mod error;
pub mod http;
pub mod protocol;

pub use bot::run;
pub use client::{GatewayClient, ReactionSink, ServiceDispatcher};
pub use error::GatewayError;
pub use http::{DiscordHttp, HttpError};
