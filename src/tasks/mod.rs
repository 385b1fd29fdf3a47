//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod persistence;
pub mod tick;

// Re-export main functions
pub use persistence::persistence_task;
pub use tick::tick_task;
