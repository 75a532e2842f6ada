//! Per-message serialization of reconciliations

use std::sync::Arc;

use dashmap::DashMap;
use starboard_core::Snowflake;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async locks, one per original message id
///
/// Reconciliations for different messages never wait on each other. When
/// disabled, `acquire` returns immediately and concurrent reconciliations of
/// the same message race (last writer wins in the mapping store).
#[derive(Debug, Clone)]
pub struct MessageLocks {
    locks: Arc<DashMap<Snowflake, Arc<Mutex<()>>>>,
    enabled: bool,
}

impl MessageLocks {
    /// Create a lock table
    pub fn new(enabled: bool) -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
            enabled,
        }
    }

    /// Check if reconciliations are serialized
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of messages currently holding or awaiting a lock
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Check if no message is locked
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Wait for exclusive access to `message_id`
    ///
    /// The entry is dropped from the table once the last holder releases it.
    pub async fn acquire(&self, message_id: Snowflake) -> MessageLockGuard {
        if !self.enabled {
            return MessageLockGuard {
                guard: None,
                message_id,
                locks: None,
            };
        }

        let mutex = self
            .locks
            .entry(message_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;

        MessageLockGuard {
            guard: Some(guard),
            message_id,
            locks: Some(Arc::clone(&self.locks)),
        }
    }
}

impl Default for MessageLocks {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Held for the duration of one reconciliation
#[derive(Debug)]
pub struct MessageLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    message_id: Snowflake,
    locks: Option<Arc<DashMap<Snowflake, Arc<Mutex<()>>>>>,
}

impl Drop for MessageLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Some(locks) = &self.locks {
            // Only the table itself still references an idle mutex
            locks.remove_if(&self.message_id, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}
