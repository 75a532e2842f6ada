//! In-memory collaborators and a test harness
//!
//! `InMemoryMappingStore`, `FakeMessageSource` and `FakeMirrorSink` implement
//! the starboard-core ports with plain maps behind `parking_lot` mutexes. Each
//! one can be told to fail or refuse, which is how the scenario tests reach
//! the recovery branches of the reconciler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use starboard_common::{Monitor, SettingsHandle};
use starboard_core::{
    Channel, DomainError, MappingRepository, Message, MessageLocation, MessageSource,
    MirrorOutcome, MirrorPost, MirrorResult, MirrorSink, ReactionEventKind, RepoResult,
    Snowflake, StarboardMapping, StarboardSettings, DEFAULT_STAR_EMOJI,
};
use starboard_service::{
    ReactionOutcome, ReactionService, ReconcileOutcome, ServiceContext, ServiceResult,
    StarboardService,
};

use crate::fixtures;

// ============================================================================
// Mapping Store
// ============================================================================

/// Mapping store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryMappingStore {
    rows: Mutex<HashMap<Snowflake, StarboardMapping>>,
    failing: AtomicBool,
    failing_writes: AtomicBool,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make upserts and removes fail while reads keep working
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    /// Seed a row directly
    pub fn insert(&self, original_id: Snowflake, mirrored_id: Snowflake, star_count: u32) {
        self.rows.lock().insert(
            original_id,
            StarboardMapping::new(original_id, mirrored_id, star_count),
        );
    }

    pub fn row(&self, original_id: Snowflake) -> Option<StarboardMapping> {
        self.rows.lock().get(&original_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    fn check_read(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> RepoResult<()> {
        self.check_read()?;
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingStore {
    async fn get(&self, original_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        self.check_read()?;
        Ok(self
            .rows
            .lock()
            .get(&original_id)
            .map(|m| m.mirrored_message_id))
    }

    async fn find(&self, original_id: Snowflake) -> RepoResult<Option<StarboardMapping>> {
        self.check_read()?;
        Ok(self.row(original_id))
    }

    async fn upsert(
        &self,
        original_id: Snowflake,
        mirrored_id: Snowflake,
        star_count: u32,
    ) -> RepoResult<()> {
        self.check_write()?;
        self.rows
            .lock()
            .entry(original_id)
            .and_modify(|m| m.replace(mirrored_id, star_count))
            .or_insert_with(|| StarboardMapping::new(original_id, mirrored_id, star_count));
        Ok(())
    }

    async fn remove(&self, original_id: Snowflake) -> RepoResult<()> {
        self.check_write()?;
        self.rows.lock().remove(&original_id);
        Ok(())
    }
}

// ============================================================================
// Message Source
// ============================================================================

/// Message source backed by maps of channels, messages and live reaction counts
#[derive(Debug, Default)]
pub struct FakeMessageSource {
    channels: Mutex<HashMap<Snowflake, Channel>>,
    messages: Mutex<HashMap<Snowflake, Message>>,
    reactions: Mutex<HashMap<(Snowflake, String), u32>>,
    count_reads: AtomicUsize,
    delete_after_fetch: AtomicBool,
}

impl FakeMessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that knows every channel of the test guild
    pub fn with_guild() -> Self {
        let source = Self::new();
        for channel in fixtures::guild_channels() {
            source.add_channel(channel);
        }
        source
    }

    pub fn add_channel(&self, channel: Channel) {
        self.channels.lock().insert(channel.id, channel);
    }

    pub fn remove_channel(&self, channel_id: Snowflake) {
        self.channels.lock().remove(&channel_id);
    }

    pub fn add_message(&self, message: Message) {
        self.messages.lock().insert(message.id, message);
    }

    /// Delete a message as the original author would
    pub fn delete_message(&self, message_id: Snowflake) {
        self.messages.lock().remove(&message_id);
    }

    /// Delete every message right after it is fetched, so the count read that
    /// follows finds nothing
    pub fn delete_after_fetch(&self, enabled: bool) {
        self.delete_after_fetch.store(enabled, Ordering::SeqCst);
    }

    /// Set the live count of `emoji` on a message
    pub fn set_reactions(&self, message_id: Snowflake, emoji: &str, count: u32) {
        self.reactions
            .lock()
            .insert((message_id, emoji.to_string()), count);
    }

    /// Set the live star count on a message
    pub fn set_stars(&self, message_id: Snowflake, count: u32) {
        self.set_reactions(message_id, DEFAULT_STAR_EMOJI, count);
    }

    /// How many times a reaction count was read
    pub fn count_reads(&self) -> usize {
        self.count_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSource for FakeMessageSource {
    async fn fetch_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RepoResult<Message> {
        let mut messages = self.messages.lock();
        let message = messages
            .get(&message_id)
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if self.delete_after_fetch.load(Ordering::SeqCst) {
            messages.remove(&message_id);
        }
        Ok(message)
    }

    async fn fetch_reaction_count(&self, message: &Message, emoji: &str) -> RepoResult<u32> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        if !self.messages.lock().contains_key(&message.id) {
            return Err(DomainError::MessageNotFound(message.id));
        }

        let live = self
            .reactions
            .lock()
            .get(&(message.id, emoji.to_string()))
            .copied();
        Ok(live.unwrap_or_else(|| message.reaction_count(emoji)))
    }

    async fn get_location(&self, message: &Message) -> RepoResult<MessageLocation> {
        let channels = self.channels.lock();
        let channel = channels
            .get(&message.channel_id)
            .cloned()
            .ok_or(DomainError::ChannelNotFound(message.channel_id))?;

        if !channel.is_thread() {
            return Ok(MessageLocation::direct(channel));
        }
        let parent = channel
            .parent_id
            .and_then(|parent_id| channels.get(&parent_id).cloned());
        Ok(MessageLocation::in_thread(channel, parent))
    }
}

// ============================================================================
// Mirror Sink
// ============================================================================

/// One call made against the mirror sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    Send { destination: Snowflake },
    Edit { destination: Snowflake, mirrored_id: Snowflake },
    Delete { destination: Snowflake, mirrored_id: Snowflake },
}

impl SinkCall {
    pub fn is_send(&self) -> bool {
        matches!(self, Self::Send { .. })
    }
}

/// Starboard channel backed by a map of live posts
///
/// Every call yields to the scheduler first, so concurrent reconciliations
/// interleave the way they would against a remote API.
#[derive(Debug)]
pub struct FakeMirrorSink {
    posts: Mutex<HashMap<Snowflake, MirrorPost>>,
    calls: Mutex<Vec<SinkCall>>,
    next_id: AtomicI64,
    forbid_sends: AtomicBool,
    forbid_edits: AtomicBool,
    forbid_deletes: AtomicBool,
    failing: AtomicBool,
}

impl Default for FakeMirrorSink {
    fn default() -> Self {
        Self {
            posts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(900_000),
            forbid_sends: AtomicBool::new(false),
            forbid_edits: AtomicBool::new(false),
            forbid_deletes: AtomicBool::new(false),
            failing: AtomicBool::new(false),
        }
    }
}

impl FakeMirrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forbid_sends(&self, forbid: bool) {
        self.forbid_sends.store(forbid, Ordering::SeqCst);
    }

    pub fn forbid_edits(&self, forbid: bool) {
        self.forbid_edits.store(forbid, Ordering::SeqCst);
    }

    pub fn forbid_deletes(&self, forbid: bool) {
        self.forbid_deletes.store(forbid, Ordering::SeqCst);
    }

    /// Make every call fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delete a post behind the bot's back, as a moderator would
    pub fn vanish(&self, mirrored_id: Snowflake) {
        self.posts.lock().remove(&mirrored_id);
    }

    pub fn post(&self, mirrored_id: Snowflake) -> Option<MirrorPost> {
        self.posts.lock().get(&mirrored_id).cloned()
    }

    /// Number of posts currently in the channel
    pub fn live_posts(&self) -> usize {
        self.posts.lock().len()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    pub fn send_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.is_send()).count()
    }

    fn record(&self, call: SinkCall) -> Result<(), DomainError> {
        self.calls.lock().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::RemoteError("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MirrorSink for FakeMirrorSink {
    async fn send(&self, destination: Snowflake, post: &MirrorPost) -> MirrorResult<Snowflake> {
        tokio::task::yield_now().await;
        self.record(SinkCall::Send { destination })?;
        if self.forbid_sends.load(Ordering::SeqCst) {
            return Ok(MirrorOutcome::Forbidden);
        }

        let id = Snowflake::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.posts.lock().insert(id, post.clone());
        Ok(MirrorOutcome::Applied(id))
    }

    async fn edit(
        &self,
        destination: Snowflake,
        mirrored_id: Snowflake,
        post: &MirrorPost,
    ) -> MirrorResult<()> {
        tokio::task::yield_now().await;
        self.record(SinkCall::Edit {
            destination,
            mirrored_id,
        })?;
        if self.forbid_edits.load(Ordering::SeqCst) {
            return Ok(MirrorOutcome::Forbidden);
        }

        match self.posts.lock().get_mut(&mirrored_id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(MirrorOutcome::Applied(()))
            }
            None => Ok(MirrorOutcome::NotFound),
        }
    }

    async fn delete(&self, destination: Snowflake, mirrored_id: Snowflake) -> MirrorResult<()> {
        tokio::task::yield_now().await;
        self.record(SinkCall::Delete {
            destination,
            mirrored_id,
        })?;
        if self.forbid_deletes.load(Ordering::SeqCst) {
            return Ok(MirrorOutcome::Forbidden);
        }

        Ok(self
            .posts
            .lock()
            .remove(&mirrored_id)
            .map_or(MirrorOutcome::NotFound, |_| MirrorOutcome::Applied(())))
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A service context wired to fresh in-memory collaborators
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryMappingStore>,
    pub source: Arc<FakeMessageSource>,
    pub sink: Arc<FakeMirrorSink>,
    pub monitor: Arc<Monitor>,
}

impl TestHarness {
    /// Fully configured starboard with the given threshold
    pub fn new(threshold: u32) -> Self {
        Self::with_settings(fixtures::settings(threshold), true)
    }

    pub fn with_settings(settings: StarboardSettings, serialize_per_message: bool) -> Self {
        let store = Arc::new(InMemoryMappingStore::new());
        let source = Arc::new(FakeMessageSource::with_guild());
        let sink = Arc::new(FakeMirrorSink::new());
        let monitor = Arc::new(Monitor::default());

        let ctx = ServiceContext::builder()
            .mapping_repo(Arc::clone(&store) as Arc<dyn MappingRepository>)
            .message_source(Arc::clone(&source) as Arc<dyn MessageSource>)
            .mirror_sink(Arc::clone(&sink) as Arc<dyn MirrorSink>)
            .monitor(Arc::clone(&monitor))
            .settings(SettingsHandle::new(settings))
            .serialize_per_message(serialize_per_message)
            .build()
            .expect("all collaborators are set");

        Self {
            ctx,
            store,
            source,
            sink,
            monitor,
        }
    }

    /// Post a message in the monitored thread
    pub fn post_message(&self, content: &str) -> Message {
        self.post_message_in(fixtures::THREAD_ID, content)
    }

    pub fn post_message_in(&self, channel_id: Snowflake, content: &str) -> Message {
        let message = fixtures::message_in(channel_id, content);
        self.source.add_message(message.clone());
        message
    }

    pub fn set_stars(&self, message: &Message, count: u32) {
        self.source.set_stars(message.id, count);
    }

    /// Reconcile with the settings as they are right now
    pub async fn reconcile(&self, message: &Message) -> ServiceResult<ReconcileOutcome> {
        let settings = self.ctx.settings().snapshot();
        StarboardService::new(&self.ctx)
            .reconcile(message, &settings)
            .await
    }

    /// Set the star count, then deliver a star notification of `kind`
    pub async fn react(
        &self,
        kind: ReactionEventKind,
        message: &Message,
        count: u32,
    ) -> ServiceResult<ReactionOutcome> {
        self.set_stars(message, count);
        let event = fixtures::star_event(kind, message);
        ReactionService::new(&self.ctx).handle(&event).await
    }

    /// The live post the mapping of `message` points at
    pub fn mirrored_post(&self, message: &Message) -> Option<MirrorPost> {
        self.store
            .row(message.id)
            .and_then(|row| self.sink.post(row.mirrored_message_id))
    }

    /// No row without a live post, and no live post without a row
    pub fn assert_consistent(&self) {
        assert_eq!(
            self.store.len(),
            self.sink.live_posts(),
            "every mapping row must match exactly one live post"
        );
        for row in self.store.rows.lock().values() {
            assert!(
                self.sink.post(row.mirrored_message_id).is_some(),
                "mapping for {} points at dead post {}",
                row.original_message_id,
                row.mirrored_message_id
            );
        }
    }
}
