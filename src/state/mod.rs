//! State management module
//!
//! This module contains the timer entry model, the canonical entry store,
//! and the application state that wires the store to the background tasks.

pub mod app_state;
pub mod entry;
pub mod store;

// Re-export main types
pub use app_state::{AppState, CompletionNotice, TickOutcome};
pub use entry::{EntryState, TimerEntry};
pub use store::{parse_duration_secs, split_names, EntryStore};
