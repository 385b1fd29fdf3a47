//! Shared tick source background task

use std::{sync::Arc, time::Duration};

use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::{state::AppState, storage::KeyValueStore};

/// Background task that drives every countdown from one logical clock.
///
/// A single 1-second interval serves the whole collection; there is never
/// more than one tick source alive, so each Running entry is decremented
/// exactly once per second. The interval only exists while at least one
/// entry is Running - the task idles on store-change notifications
/// otherwise and tears the interval down whenever the store goes idle.
pub async fn tick_task<S: KeyValueStore>(state: Arc<AppState<S>>) {
    info!("Starting tick task");

    let mut changes = state.subscribe_store_changes();

    loop {
        // Idle until at least one entry is Running.
        match state.running_count() {
            Ok(0) => match changes.recv().await {
                Ok(running) if running > 0 => {}
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Tick task lagged behind {} store changes", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    info!("Store change channel closed, stopping tick task");
                    return;
                }
            },
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read running count: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        }

        debug!("Entries running, tick interval active");
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately; consume it so the
        // first decrement lands a full second after (re)activation.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.apply_tick() {
                        Ok(outcome) => {
                            if outcome.running == 0 {
                                debug!("No entries running, tick interval stopped");
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Tick failed: {}", e);
                            break;
                        }
                    }
                }

                change = changes.recv() => {
                    match change {
                        Ok(0) => {
                            debug!("All entries stopped, tick interval stopped");
                            break;
                        }
                        Ok(_) => {
                            // Running set changed but something still runs;
                            // the existing interval keeps the cadence.
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("Tick task lagged behind {} store changes", skipped);
                        }
                        Err(RecvError::Closed) => {
                            info!("Store change channel closed, stopping tick task");
                            return;
                        }
                    }
                }
            }
        }
    }
}
