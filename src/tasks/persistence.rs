//! Write-through persistence background task

use tokio::sync::watch;
use tracing::info;

use crate::{
    state::TimerEntry,
    storage::{timers::save_entries, KeyValueStore},
};

/// Background task that writes every published snapshot through to the
/// key-value store.
///
/// The snapshot channel is a `watch`, so if writes fall behind the task
/// skips straight to the latest collection - intermediate snapshots are
/// superseded, never reordered. Write failures are logged inside the
/// adapter and absorbed; in-memory state stays authoritative.
pub async fn persistence_task<S: KeyValueStore>(
    store: S,
    mut snapshots: watch::Receiver<Vec<TimerEntry>>,
) {
    info!("Starting persistence task");

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        save_entries(&store, &snapshot).await;
    }

    info!("Snapshot channel closed, stopping persistence task");
}
