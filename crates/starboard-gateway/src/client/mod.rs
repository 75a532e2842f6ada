//! Discord gateway client
//!
//! Keeps one gateway connection alive and forwards reaction dispatches.

mod dispatcher;
mod gateway;
mod session;

pub use dispatcher::{ReactionSink, ServiceDispatcher};
pub use gateway::{backoff_delay, GatewayClient};
pub use session::SessionState;
