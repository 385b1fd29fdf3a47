//! Activity Timers - A state-managed HTTP server for countdown timers
//!
//! This library manages named, timed activities grouped into categories.
//! Each activity is an independent countdown; progress persists across
//! restarts through an asynchronous string-keyed store. A single shared
//! tick source drives every running timer once per second.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
