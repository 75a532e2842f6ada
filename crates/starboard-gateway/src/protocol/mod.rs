//! Discord gateway protocol definitions
//!
//! Op codes, the message envelope, payloads, close codes and intents, as seen
//! from the client side of the connection.

mod close_codes;
mod intents;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use intents::Intents;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{
    EmojiPayload, HelloPayload, IdentifyPayload, IdentifyProperties, ReactionPayload,
    ReadyPayload, ReadyUser, ResumePayload,
};
