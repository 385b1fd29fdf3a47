//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{error::TimerError, storage::KeyValueStore};

use super::{entry::TimerEntry, store::EntryStore};

/// Completion event surfaced to the presentation layer when an entry
/// finishes its countdown.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompletionNotice {
    pub entry_name: String,
    pub completed_at: DateTime<Utc>,
}

/// Result of one tick pass over the whole collection.
#[derive(Debug)]
pub struct TickOutcome {
    /// Completion notices raised on this tick, in entry order.
    pub completed: Vec<CompletionNotice>,
    /// Entries still Running after the tick.
    pub running: usize,
}

/// Main application state: the entry store plus the channels that connect
/// it to the background tasks.
///
/// Ticks and user mutations serialize on the store mutex; every mutation
/// publishes the full updated snapshot on the persistence channel before
/// returning. The channel is a `watch`, so the writer task always sees the
/// latest snapshot and a later write supersedes an earlier one.
#[derive(Debug)]
pub struct AppState<S: KeyValueStore> {
    entries: Mutex<EntryStore>,
    /// Key-value store shared with read-only collaborators (history, theme).
    pub storage: S,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Notifies the tick task that the set of Running entries may have
    /// changed. Carries the current running count.
    store_change_tx: broadcast::Sender<usize>,
    /// Write-through channel: full collection snapshots for the persistence task.
    persist_tx: watch::Sender<Vec<TimerEntry>>,
    /// Keep the receiver alive to prevent channel closure
    _persist_rx: watch::Receiver<Vec<TimerEntry>>,
    /// Latest pending completion; a newer completion overwrites an
    /// unacknowledged one.
    completion_tx: watch::Sender<Option<CompletionNotice>>,
    _completion_rx: watch::Receiver<Option<CompletionNotice>>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Create the application state around an already-loaded collection.
    pub fn new(entries: Vec<TimerEntry>, storage: S, host: String, port: u16) -> Self {
        let (store_change_tx, _) = broadcast::channel(100);
        let (persist_tx, persist_rx) = watch::channel(entries.clone());
        let (completion_tx, completion_rx) = watch::channel(None);

        Self {
            entries: Mutex::new(EntryStore::new(entries)),
            storage,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            store_change_tx,
            persist_tx,
            _persist_rx: persist_rx,
            completion_tx,
            _completion_rx: completion_rx,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Immutable snapshot of the full collection.
    pub fn entries_snapshot(&self) -> Result<Vec<TimerEntry>, TimerError> {
        Ok(self.lock_entries()?.snapshot())
    }

    /// Category -> entry indices mapping, recomputed on every call.
    pub fn categories(&self) -> Result<Vec<(String, Vec<usize>)>, TimerError> {
        Ok(self.lock_entries()?.categories())
    }

    /// Snapshot and category grouping taken under one lock acquisition, so
    /// the grouping's indices always address the returned snapshot even
    /// while other callers mutate the store.
    #[allow(clippy::type_complexity)]
    pub fn entries_with_categories(
        &self,
    ) -> Result<(Vec<TimerEntry>, Vec<(String, Vec<usize>)>), TimerError> {
        let entries = self.lock_entries()?;
        Ok((entries.snapshot(), entries.categories()))
    }

    pub fn running_count(&self) -> Result<usize, TimerError> {
        Ok(self.lock_entries()?.running_count())
    }

    /// The pending completion, if the user has not acknowledged it yet.
    pub fn pending_completion(&self) -> Option<CompletionNotice> {
        self.completion_tx.borrow().clone()
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    // ── Subscriptions for background tasks ───────────────────────────

    pub fn subscribe_store_changes(&self) -> broadcast::Receiver<usize> {
        self.store_change_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<Vec<TimerEntry>> {
        self.persist_tx.subscribe()
    }

    // ── User intents ─────────────────────────────────────────────────

    /// Add one Running entry per name under the shared category/duration.
    pub fn add_entries(
        &self,
        category: &str,
        duration_secs: u64,
        names: &[String],
    ) -> Result<Vec<TimerEntry>, TimerError> {
        let (added, snapshot, running) = {
            let mut entries = self.lock_entries()?;
            let added = entries.add_entries(category, duration_secs, names)?;
            (added, entries.snapshot(), entries.running_count())
        };
        info!(
            "Added {} timer(s) to category '{}'",
            added.len(),
            added[0].category
        );
        self.record_action("add");
        self.publish(snapshot, running);
        Ok(added)
    }

    /// Resume the entry at `index`. Returns whether it changed.
    pub fn start_entry(&self, index: usize) -> Result<bool, TimerError> {
        self.mutate("start", |entries| entries.start_entry(index))
    }

    /// Pause the entry at `index`. Returns whether it changed.
    pub fn pause_entry(&self, index: usize) -> Result<bool, TimerError> {
        self.mutate("pause", |entries| entries.pause_entry(index))
    }

    /// Reset the entry at `index` to its full duration.
    pub fn reset_entry(&self, index: usize) -> Result<(), TimerError> {
        self.mutate("reset", |entries| entries.reset_entry(index))
    }

    /// Resume every paused entry in the category. One write-through for the
    /// whole bulk operation, not one per affected entry.
    pub fn bulk_start(&self, category: &str) -> Result<usize, TimerError> {
        self.mutate("bulk-start", |entries| Ok(entries.bulk_start(category)))
    }

    /// Pause every Running entry in the category.
    pub fn bulk_pause(&self, category: &str) -> Result<usize, TimerError> {
        self.mutate("bulk-pause", |entries| Ok(entries.bulk_pause(category)))
    }

    /// Reset every entry in the category.
    pub fn bulk_reset(&self, category: &str) -> Result<usize, TimerError> {
        self.mutate("bulk-reset", |entries| Ok(entries.bulk_reset(category)))
    }

    /// Clear the pending completion after the user has seen it. Returns the
    /// notice that was pending, if any.
    pub fn acknowledge_completion(&self) -> Option<CompletionNotice> {
        let pending = self.completion_tx.borrow().clone();
        if pending.is_some() {
            let _ = self.completion_tx.send(None);
        }
        pending
    }

    // ── Tick entry point ─────────────────────────────────────────────

    /// Advance every Running entry by one second. Persists the updated
    /// collection exactly once and raises one completion notice per entry
    /// that finished on this tick, in entry order.
    pub fn apply_tick(&self) -> Result<TickOutcome, TimerError> {
        let (completed_names, snapshot, running) = {
            let mut entries = self.lock_entries()?;
            let completed = entries.apply_tick();
            (completed, entries.snapshot(), entries.running_count())
        };

        self.write_through(snapshot);

        let completed: Vec<CompletionNotice> = completed_names
            .into_iter()
            .map(|entry_name| CompletionNotice {
                entry_name,
                completed_at: Utc::now(),
            })
            .collect();
        for notice in &completed {
            info!("Timer '{}' completed", notice.entry_name);
            if self.completion_tx.send(Some(notice.clone())).is_err() {
                warn!("Failed to publish completion notice");
            }
        }

        Ok(TickOutcome { completed, running })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn lock_entries(&self) -> Result<MutexGuard<'_, EntryStore>, TimerError> {
        self.entries
            .lock()
            .map_err(|_| TimerError::internal("entry store lock poisoned"))
    }

    /// Apply one mutation under the lock, then record it and publish the
    /// updated snapshot.
    fn mutate<T>(
        &self,
        action: &str,
        mutation: impl FnOnce(&mut EntryStore) -> Result<T, TimerError>,
    ) -> Result<T, TimerError> {
        let (result, snapshot, running) = {
            let mut entries = self.lock_entries()?;
            let result = mutation(&mut entries)?;
            (result, entries.snapshot(), entries.running_count())
        };
        self.record_action(action);
        self.publish(snapshot, running);
        Ok(result)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Write-through plus tick-task wake-up after a user mutation.
    fn publish(&self, snapshot: Vec<TimerEntry>, running: usize) {
        self.write_through(snapshot);
        if self.store_change_tx.send(running).is_err() {
            debug!("No tick task subscribed for store changes");
        }
    }

    fn write_through(&self, snapshot: Vec<TimerEntry>) {
        if self.persist_tx.send(snapshot).is_err() {
            warn!("Failed to publish snapshot for persistence");
        }
    }
}
