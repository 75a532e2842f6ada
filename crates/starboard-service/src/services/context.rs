//! Service context - dependency container for services
//!
//! Holds the mapping store, the Discord-facing collaborators, the live
//! settings, and the metrics sinks.

use std::sync::Arc;

use starboard_common::{Monitor, SettingsHandle};
use starboard_core::{MappingRepository, MessageSource, MetricsSink, MirrorSink};

use super::error::{ServiceError, ServiceResult};
use super::locks::MessageLocks;

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same collaborators, settings,
/// monitor and lock table.
#[derive(Clone)]
pub struct ServiceContext {
    // Mapping store
    mapping_repo: Arc<dyn MappingRepository>,

    // Discord collaborators
    message_source: Arc<dyn MessageSource>,
    mirror_sink: Arc<dyn MirrorSink>,

    // Observability
    metrics: Arc<dyn MetricsSink>,
    monitor: Arc<Monitor>,

    // Runtime state
    settings: SettingsHandle,
    locks: MessageLocks,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        mapping_repo: Arc<dyn MappingRepository>,
        message_source: Arc<dyn MessageSource>,
        mirror_sink: Arc<dyn MirrorSink>,
        metrics: Arc<dyn MetricsSink>,
        monitor: Arc<Monitor>,
        settings: SettingsHandle,
        locks: MessageLocks,
    ) -> Self {
        Self {
            mapping_repo,
            message_source,
            mirror_sink,
            metrics,
            monitor,
            settings,
            locks,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Mapping Store ===

    /// Get the mapping repository
    pub fn mapping_repo(&self) -> &dyn MappingRepository {
        self.mapping_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the message source
    pub fn message_source(&self) -> &dyn MessageSource {
        self.message_source.as_ref()
    }

    /// Get the mirror sink
    pub fn mirror_sink(&self) -> &dyn MirrorSink {
        self.mirror_sink.as_ref()
    }

    // === Observability ===

    /// Get the metrics sink
    pub fn metrics(&self) -> &dyn MetricsSink {
        self.metrics.as_ref()
    }

    /// Get the in-memory monitor
    pub fn monitor(&self) -> &Monitor {
        self.monitor.as_ref()
    }

    // === Runtime State ===

    /// Get the live settings handle
    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    /// Get the per-message lock table
    pub fn locks(&self) -> &MessageLocks {
        &self.locks
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("mapping_repo", &"dyn MappingRepository")
            .field("collaborators", &"...")
            .field("settings", &self.settings)
            .field("locks", &self.locks)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// `metrics` defaults to the monitor, the monitor to a fresh `Monitor`,
/// settings to `StarboardSettings::default()`, and locks to enabled.
#[derive(Default)]
pub struct ServiceContextBuilder {
    mapping_repo: Option<Arc<dyn MappingRepository>>,
    message_source: Option<Arc<dyn MessageSource>>,
    mirror_sink: Option<Arc<dyn MirrorSink>>,
    metrics: Option<Arc<dyn MetricsSink>>,
    monitor: Option<Arc<Monitor>>,
    settings: Option<SettingsHandle>,
    locks: Option<MessageLocks>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapping_repo(mut self, repo: Arc<dyn MappingRepository>) -> Self {
        self.mapping_repo = Some(repo);
        self
    }

    pub fn message_source(mut self, source: Arc<dyn MessageSource>) -> Self {
        self.message_source = Some(source);
        self
    }

    pub fn mirror_sink(mut self, sink: Arc<dyn MirrorSink>) -> Self {
        self.mirror_sink = Some(sink);
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn monitor(mut self, monitor: Arc<Monitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn settings(mut self, settings: SettingsHandle) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn serialize_per_message(mut self, enabled: bool) -> Self {
        self.locks = Some(MessageLocks::new(enabled));
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a collaborator is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let monitor = self.monitor.unwrap_or_default();
        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::clone(&monitor) as Arc<dyn MetricsSink>);

        Ok(ServiceContext::new(
            self.mapping_repo
                .ok_or_else(|| ServiceError::validation("mapping_repo is required"))?,
            self.message_source
                .ok_or_else(|| ServiceError::validation("message_source is required"))?,
            self.mirror_sink
                .ok_or_else(|| ServiceError::validation("mirror_sink is required"))?,
            metrics,
            monitor,
            self.settings.unwrap_or_default(),
            self.locks.unwrap_or_default(),
        ))
    }
}
