//! Gateway session state carried across reconnects

use starboard_core::Snowflake;

use crate::protocol::{ReadyPayload, ResumePayload};

/// What the client remembers between connections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub session_id: Option<String>,
    pub resume_url: Option<String>,
    /// Last dispatch sequence number received
    pub sequence: Option<u64>,
    /// The bot's own user id, from `READY`
    pub user_id: Option<Snowflake>,
}

impl SessionState {
    /// Record a sequence number from a received frame
    pub fn observe_sequence(&mut self, sequence: Option<u64>) {
        if let Some(s) = sequence {
            self.sequence = Some(s);
        }
    }

    /// Record a fresh session from `READY`
    pub fn on_ready(&mut self, ready: ReadyPayload) {
        self.session_id = Some(ready.session_id);
        self.resume_url = ready.resume_gateway_url;
        self.user_id = Some(ready.user.id);
    }

    /// Forget the session; the next connection identifies from scratch
    pub fn reset(&mut self) {
        self.session_id = None;
        self.resume_url = None;
        self.sequence = None;
    }

    /// Check if the next connection can resume
    pub fn can_resume(&self) -> bool {
        self.session_id.is_some() && self.sequence.is_some()
    }

    /// Resume payload, if the session can be resumed
    pub fn resume_payload(&self, token: &str) -> Option<ResumePayload> {
        Some(ResumePayload {
            token: token.to_string(),
            session_id: self.session_id.clone()?,
            seq: self.sequence?,
        })
    }

    /// URL for the next connection
    ///
    /// Resumes go to the URL handed out in `READY`, with the query string
    /// (version and encoding) of the configured gateway URL.
    pub fn connect_url(&self, gateway_url: &str) -> String {
        match (&self.resume_url, self.can_resume()) {
            (Some(resume_url), true) => {
                let query = gateway_url
                    .split_once('?')
                    .map_or("v=10&encoding=json", |(_, q)| q);
                format!("{}/?{query}", resume_url.trim_end_matches('/'))
            }
            _ => gateway_url.to_string(),
        }
    }
}
