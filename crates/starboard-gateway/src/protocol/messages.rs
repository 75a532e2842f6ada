//! Gateway message format
//!
//! Every frame on the gateway connection is a JSON object of this shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use starboard_core::{ReactionEvent, ReactionEventKind};

use super::{HelloPayload, IdentifyPayload, OpCode, ReactionPayload, ReadyPayload, ResumePayload};

/// Gateway message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default)]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Client Messages ===

    /// Create a Heartbeat message (op=1) carrying the last sequence seen
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: Some(last_sequence.map_or(Value::Null, |s| Value::Number(s.into()))),
        }
    }

    /// Create an Identify message (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload)?),
        })
    }

    /// Create a Resume message (op=6)
    pub fn resume(payload: &ResumePayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Resume,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload)?),
        })
    }

    // === Parsing Server Messages ===

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.data()
    }

    /// Try to parse a `READY` dispatch
    pub fn as_ready(&self) -> Option<ReadyPayload> {
        if self.event_name() != Some("READY") {
            return None;
        }
        self.data()
    }

    /// Try to parse a reaction add/remove dispatch into a domain event
    pub fn as_reaction_event(&self) -> Option<ReactionEvent> {
        let kind = match self.event_name()? {
            "MESSAGE_REACTION_ADD" => ReactionEventKind::Added,
            "MESSAGE_REACTION_REMOVE" => ReactionEventKind::Removed,
            _ => return None,
        };
        self.data::<ReactionPayload>()
            .map(|payload| payload.into_event(kind))
    }

    /// For op=7: whether the session may be resumed
    pub fn as_invalid_session(&self) -> Option<bool> {
        if self.op != OpCode::InvalidSession {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    /// Dispatch event name (op=0 only)
    pub fn event_name(&self) -> Option<&str> {
        if self.op != OpCode::Dispatch {
            return None;
        }
        self.t.as_deref()
    }

    fn data<T: DeserializeOwned>(&self) -> Option<T> {
        self.d
            .as_ref()
            .and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
