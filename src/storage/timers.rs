//! Persistence adapter for the timer collection
//!
//! Owns the on-disk schema: a JSON array under the `storedTimers` key, one
//! record per entry, in collection order. Both directions are fail-soft -
//! a missing or malformed value loads as an empty collection, a write
//! failure is logged and swallowed. In-memory state stays authoritative
//! for the session either way.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::state::{EntryState, TimerEntry};

use super::kv::{KeyValueStore, StorageError};

/// Key the full collection is stored under.
pub const STORED_TIMERS_KEY: &str = "storedTimers";

/// On-disk record for one entry. `time` is the original duration, `timer`
/// the remaining seconds. `status` and `isPaused` jointly encode the state:
/// `isPaused` is false only while Running. `isSubmitted` is always true
/// and kept for schema compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    category: String,
    name: String,
    time: u64,
    timer: u64,
    #[serde(rename = "isSubmitted")]
    is_submitted: bool,
    #[serde(rename = "isPaused")]
    is_paused: bool,
    status: EntryState,
}

impl From<&TimerEntry> for StoredEntry {
    fn from(entry: &TimerEntry) -> Self {
        Self {
            category: entry.category.clone(),
            name: entry.name.clone(),
            time: entry.duration_secs,
            timer: entry.remaining_secs,
            is_submitted: true,
            is_paused: entry.state.is_paused(),
            status: entry.state,
        }
    }
}

impl From<StoredEntry> for TimerEntry {
    fn from(stored: StoredEntry) -> Self {
        // `status` wins over `isPaused` if the two ever disagree. The
        // remaining time and state are reconciled so that zero remaining
        // and Completed imply each other: a Running entry stuck at zero
        // would never tick again yet keep the tick interval alive.
        let mut remaining_secs = stored.timer.min(stored.time);
        let mut state = stored.status;
        if state == EntryState::Completed {
            remaining_secs = 0;
        } else if remaining_secs == 0 {
            state = EntryState::Completed;
        }
        Self {
            category: stored.category,
            name: stored.name,
            duration_secs: stored.time,
            remaining_secs,
            state,
        }
    }
}

/// Load the persisted collection. Absent, unreadable, or malformed values
/// all yield an empty collection; the failure is logged, never raised.
pub async fn load_entries<S: KeyValueStore>(store: &S) -> Vec<TimerEntry> {
    let raw = match store.get(STORED_TIMERS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("Failed to read stored timers, starting empty: {}", err);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<StoredEntry>>(&raw) {
        Ok(stored) => stored.into_iter().map(TimerEntry::from).collect(),
        Err(err) => {
            warn!("Stored timers are malformed, starting empty: {}", err);
            Vec::new()
        }
    }
}

/// Persist the full collection as one value. Write failures are logged and
/// swallowed; a later write always supersedes an earlier one because the
/// full latest snapshot is written every time.
pub async fn save_entries<S: KeyValueStore>(store: &S, entries: &[TimerEntry]) {
    if let Err(err) = try_save_entries(store, entries).await {
        error!("Failed to persist timers: {}", err);
    }
}

async fn try_save_entries<S: KeyValueStore>(
    store: &S,
    entries: &[TimerEntry],
) -> Result<(), StorageError> {
    let stored: Vec<StoredEntry> = entries.iter().map(StoredEntry::from).collect();
    let raw = serde_json::to_string(&stored)?;
    store.set(STORED_TIMERS_KEY, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;

    fn sample_entries() -> Vec<TimerEntry> {
        let mut read = TimerEntry::new("Study", "Read", 300);
        read.tick();
        let mut dishes = TimerEntry::new("Chores", "Dishes", 2);
        dishes.tick();
        dishes.tick();
        let mut write = TimerEntry::new("Study", "Write", 300);
        write.pause();
        let mut review = TimerEntry::new("Study", "Review", 60);
        review.reset();
        vec![read, dishes, write, review]
    }

    #[tokio::test]
    async fn save_then_load_preserves_order_fields_and_states() {
        let store = MemoryStore::default();
        let entries = sample_entries();
        save_entries(&store, &entries).await;
        let loaded = load_entries(&store).await;
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn persisted_schema_matches_the_stored_timers_layout() {
        let store = MemoryStore::default();
        save_entries(&store, &sample_entries()).await;

        let raw = store.get(STORED_TIMERS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 4);

        let read = &rows[0];
        assert_eq!(read["category"], "Study");
        assert_eq!(read["name"], "Read");
        assert_eq!(read["time"], 300);
        assert_eq!(read["timer"], 299);
        assert_eq!(read["isSubmitted"], true);
        assert_eq!(read["isPaused"], false);
        assert_eq!(read["status"], "Running");

        let dishes = &rows[1];
        assert_eq!(dishes["status"], "Completed");
        assert_eq!(dishes["isPaused"], true);
        assert_eq!(dishes["timer"], 0);

        assert_eq!(rows[2]["status"], "Paused");
        assert_eq!(rows[2]["isPaused"], true);
        assert_eq!(rows[3]["status"], "Reset");
        assert_eq!(rows[3]["isPaused"], true);
    }

    #[tokio::test]
    async fn absent_value_loads_as_empty_collection() {
        let store = MemoryStore::default();
        assert!(load_entries(&store).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_value_loads_as_empty_collection() {
        let store = MemoryStore::default();
        for garbage in ["not json", "{\"category\":1}", "[{\"category\":true}]"] {
            store.set(STORED_TIMERS_KEY, garbage).await.unwrap();
            assert!(load_entries(&store).await.is_empty());
        }
    }

    #[tokio::test]
    async fn stored_remaining_time_is_clamped_to_the_duration() {
        let store = MemoryStore::default();
        let raw = r#"[{"category":"Study","name":"Read","time":10,"timer":99,
                       "isSubmitted":true,"isPaused":false,"status":"Running"}]"#;
        store.set(STORED_TIMERS_KEY, raw).await.unwrap();
        let loaded = load_entries(&store).await;
        assert_eq!(loaded[0].remaining_secs, 10);
    }

    #[tokio::test]
    async fn zero_remaining_loads_as_completed() {
        let store = MemoryStore::default();
        // A Running record at zero would otherwise never complete and
        // never stop counting as running.
        let raw = r#"[{"category":"Study","name":"Read","time":10,"timer":0,
                       "isSubmitted":true,"isPaused":false,"status":"Running"}]"#;
        store.set(STORED_TIMERS_KEY, raw).await.unwrap();
        let loaded = load_entries(&store).await;
        assert_eq!(loaded[0].state, EntryState::Completed);
        assert_eq!(loaded[0].remaining_secs, 0);
    }

    #[tokio::test]
    async fn completed_status_loads_with_zero_remaining() {
        let store = MemoryStore::default();
        let raw = r#"[{"category":"Study","name":"Read","time":10,"timer":7,
                       "isSubmitted":true,"isPaused":true,"status":"Completed"}]"#;
        store.set(STORED_TIMERS_KEY, raw).await.unwrap();
        let loaded = load_entries(&store).await;
        assert_eq!(loaded[0].state, EntryState::Completed);
        assert_eq!(loaded[0].remaining_secs, 0);
    }
}
