//! In-memory monitor
//!
//! Counts reactions, starboard updates and store queries so an administrator
//! can ask for a statistics snapshot, and keeps an update history that a chart
//! renderer can plot.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use starboard_core::MetricsSink;

/// Snapshot of the monitor counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorStats {
    pub reaction_add_count: u64,
    pub reaction_remove_count: u64,
    pub starboard_updates: u64,
    pub avg_update_time: Duration,
    pub max_update_time: Duration,
    pub db_query_count: u64,
    pub db_total_time: Duration,
}

#[derive(Debug, Default)]
struct MonitorState {
    reaction_add_count: u64,
    reaction_remove_count: u64,
    starboard_updates: u64,
    total_update_time: Duration,
    max_update_time: Duration,
    db_query_count: u64,
    db_total_time: Duration,
    /// (time of update, cumulative update count)
    history: VecDeque<(DateTime<Utc>, u64)>,
}

/// Thread-safe in-memory metrics sink
#[derive(Debug)]
pub struct Monitor {
    state: Mutex<MonitorState>,
    history_capacity: usize,
}

impl Monitor {
    /// Create a monitor keeping at most `history_capacity` history points
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            state: Mutex::new(MonitorState::default()),
            history_capacity: history_capacity.max(1),
        }
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> MonitorStats {
        let state = self.state.lock();
        let avg_update_time = u32::try_from(state.starboard_updates)
            .ok()
            .filter(|n| *n > 0)
            .map_or(Duration::ZERO, |n| state.total_update_time / n);

        MonitorStats {
            reaction_add_count: state.reaction_add_count,
            reaction_remove_count: state.reaction_remove_count,
            starboard_updates: state.starboard_updates,
            avg_update_time,
            max_update_time: state.max_update_time,
            db_query_count: state.db_query_count,
            db_total_time: state.db_total_time,
        }
    }

    /// Update history, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<(DateTime<Utc>, u64)> {
        self.state.lock().history.iter().copied().collect()
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl MetricsSink for Monitor {
    fn record_reaction_added(&self) {
        self.state.lock().reaction_add_count += 1;
    }

    fn record_reaction_removed(&self) {
        self.state.lock().reaction_remove_count += 1;
    }

    fn record_reconciliation(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.starboard_updates += 1;
        state.total_update_time += duration;
        state.max_update_time = state.max_update_time.max(duration);

        let point = (Utc::now(), state.starboard_updates);
        if state.history.len() == self.history_capacity {
            state.history.pop_front();
        }
        state.history.push_back(point);
    }

    fn record_store_operation(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.db_query_count += 1;
        state.db_total_time += duration;
    }
}
