//! Gateway connection loop

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use rand::Rng;
use starboard_common::DiscordConfig;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};
use tracing::{debug, error, info, warn};

use crate::error::GatewayError;
use crate::protocol::{
    CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, Intents, OpCode,
};

use super::dispatcher::ReactionSink;
use super::session::SessionState;

/// How long to wait for Hello after connecting
const HELLO_TIMEOUT: Duration = Duration::from_secs(20);

/// Consecutive failed connections before giving up
const MAX_RECONNECT_ATTEMPTS: u32 = 10;

const RECONNECT_BASE_DELAY: Duration = Duration::from_secs(1);
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Why a connection ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disconnect {
    /// Reconnect and resume the session
    Resume,
    /// Reconnect with a fresh Identify
    Reidentify,
    /// Server invalidated the session (op 7)
    InvalidSession { resumable: bool },
}

/// What the read loop must do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    SendHeartbeat,
    Disconnect(Disconnect),
}

/// Exponential reconnect delay: 1s, 2s, 4s, ... capped at one minute
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    RECONNECT_BASE_DELAY
        .saturating_mul(factor)
        .min(RECONNECT_MAX_DELAY)
}

/// Random share of the heartbeat interval before the first beat
fn first_beat_delay(interval: Duration) -> Duration {
    interval.mul_f64(rand::thread_rng().gen::<f64>())
}

/// Wait before reconnecting after an invalid session
fn invalid_session_delay() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(1_000..=5_000))
}

/// Discord gateway client
///
/// `run` connects, identifies (or resumes), heartbeats and forwards reaction
/// dispatches to the sink until the gateway closes with a fatal code or
/// reconnecting keeps failing.
pub struct GatewayClient {
    token: String,
    gateway_url: String,
    intents: Intents,
    sink: Arc<dyn ReactionSink>,
    session: SessionState,
    awaiting_ack: bool,
    reconnect_attempts: u32,
}

impl GatewayClient {
    /// Create a new client
    pub fn new(config: &DiscordConfig, sink: Arc<dyn ReactionSink>) -> Self {
        Self {
            token: config.token.clone(),
            gateway_url: config.gateway_url.clone(),
            intents: Intents::STARBOARD,
            sink,
            session: SessionState::default(),
            awaiting_ack: false,
            reconnect_attempts: 0,
        }
    }

    /// Override the intents sent on Identify
    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    /// Current session state
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Connect and keep reconnecting until a fatal error
    pub async fn run(&mut self) -> Result<(), GatewayError> {
        loop {
            match self.connect_once().await {
                Ok(Disconnect::Resume) => {
                    info!("Reconnecting to gateway");
                }
                Ok(Disconnect::Reidentify) => {
                    info!("Reconnecting to gateway with a new session");
                    self.session.reset();
                }
                Ok(Disconnect::InvalidSession { resumable }) => {
                    warn!(resumable, "Gateway invalidated the session");
                    if !resumable {
                        self.session.reset();
                    }
                    tokio::time::sleep(invalid_session_delay()).await;
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Gateway connection failed permanently");
                    return Err(e);
                }
                Err(e) => {
                    self.reconnect_attempts += 1;
                    if self.reconnect_attempts > MAX_RECONNECT_ATTEMPTS {
                        return Err(GatewayError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                    }

                    let delay = backoff_delay(self.reconnect_attempts);
                    warn!(
                        error = %e,
                        attempt = self.reconnect_attempts,
                        delay_secs = delay.as_secs(),
                        "Gateway connection lost, scheduling reconnect"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One connection, from the handshake until it ends
    async fn connect_once(&mut self) -> Result<Disconnect, GatewayError> {
        let url = self.session.connect_url(&self.gateway_url);
        info!(resuming = self.session.can_resume(), "Connecting to gateway");

        let (ws_stream, _) = connect_async(url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        let hello = read_hello(&mut read).await?;
        let interval = Duration::from_millis(hello.heartbeat_interval);
        debug!(heartbeat_interval_ms = hello.heartbeat_interval, "Received Hello");

        let opening = match self.session.resume_payload(&self.token) {
            Some(resume) => GatewayMessage::resume(&resume)?,
            None => GatewayMessage::identify(
                &IdentifyPayload::new(self.token.clone()).with_intents(self.intents),
            )?,
        };
        send(&mut write, &opening).await?;

        let mut heartbeat = interval_at(Instant::now() + first_beat_delay(interval), interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.awaiting_ack = false;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if self.awaiting_ack {
                        warn!("Heartbeat was not acknowledged, reconnecting");
                        return Ok(Disconnect::Resume);
                    }
                    send(&mut write, &GatewayMessage::heartbeat(self.session.sequence)).await?;
                    self.awaiting_ack = true;
                }
                frame = read.next() => {
                    let Some(frame) = frame else {
                        return Ok(Disconnect::Resume);
                    };
                    match frame? {
                        WsMessage::Text(text) => match GatewayMessage::from_json(&text) {
                            Ok(msg) => match self.handle_message(&msg) {
                                Step::Continue => {}
                                Step::SendHeartbeat => {
                                    send(&mut write, &GatewayMessage::heartbeat(self.session.sequence)).await?;
                                }
                                Step::Disconnect(reason) => return Ok(reason),
                            },
                            Err(e) => warn!(error = %e, "Ignoring unparseable gateway frame"),
                        },
                        WsMessage::Close(frame) => {
                            return on_close(frame.map(|f| u16::from(f.code)));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Apply one server message to the session
    fn handle_message(&mut self, msg: &GatewayMessage) -> Step {
        self.session.observe_sequence(msg.s);

        match msg.op {
            OpCode::Dispatch => {
                self.handle_dispatch(msg);
                Step::Continue
            }
            OpCode::Heartbeat => Step::SendHeartbeat,
            OpCode::HeartbeatAck => {
                self.awaiting_ack = false;
                Step::Continue
            }
            OpCode::Reconnect => {
                info!("Gateway requested a reconnect");
                Step::Disconnect(Disconnect::Resume)
            }
            OpCode::InvalidSession => Step::Disconnect(Disconnect::InvalidSession {
                resumable: msg.as_invalid_session().unwrap_or(false),
            }),
            op => {
                debug!(op = %op, "Ignoring gateway op");
                Step::Continue
            }
        }
    }

    fn handle_dispatch(&mut self, msg: &GatewayMessage) {
        match msg.event_name() {
            Some("READY") => {
                if let Some(ready) = msg.as_ready() {
                    info!(user = %ready.user.username, user_id = %ready.user.id, "Gateway session ready");
                    self.session.on_ready(ready);
                    self.reconnect_attempts = 0;
                }
            }
            Some("RESUMED") => {
                info!(sequence = ?self.session.sequence, "Gateway session resumed");
                self.reconnect_attempts = 0;
            }
            Some("MESSAGE_REACTION_ADD" | "MESSAGE_REACTION_REMOVE") => {
                match msg.as_reaction_event() {
                    Some(event) => self.sink.dispatch(event),
                    None => warn!(event = ?msg.t, "Malformed reaction dispatch"),
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("gateway_url", &self.gateway_url)
            .field("intents", &self.intents)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Decide how to continue after a close frame
fn on_close(code: Option<u16>) -> Result<Disconnect, GatewayError> {
    match code.and_then(CloseCode::from_u16) {
        Some(code) if !code.should_reconnect() => Err(GatewayError::Closed(code)),
        Some(code) if !code.can_resume() => {
            warn!(code = %code, "Gateway closed the session");
            Ok(Disconnect::Reidentify)
        }
        other => {
            info!(code = ?code, close = ?other, "Gateway closed the connection");
            Ok(Disconnect::Resume)
        }
    }
}

async fn send<S>(write: &mut S, msg: &GatewayMessage) -> Result<(), GatewayError>
where
    S: Sink<WsMessage, Error = tungstenite::Error> + Unpin,
{
    write.send(WsMessage::Text(msg.to_json()?.into())).await?;
    Ok(())
}

async fn read_hello<S>(read: &mut S) -> Result<HelloPayload, GatewayError>
where
    S: Stream<Item = Result<WsMessage, tungstenite::Error>> + Unpin,
{
    let frame = tokio::time::timeout(HELLO_TIMEOUT, read.next())
        .await
        .map_err(|_| GatewayError::protocol("timed out waiting for Hello"))?
        .ok_or_else(|| GatewayError::protocol("connection closed before Hello"))??;

    match frame {
        WsMessage::Text(text) => GatewayMessage::from_json(&text)?
            .as_hello()
            .ok_or_else(|| GatewayError::protocol("first frame was not Hello")),
        other => Err(GatewayError::protocol(format!(
            "unexpected first frame: {other:?}"
        ))),
    }
}
