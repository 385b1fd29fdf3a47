//! Persistence module
//!
//! This module contains the key-value store abstraction and the adapters
//! that serialize application state through it.

pub mod kv;
pub mod theme;
pub mod timers;

// Re-export main types
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use theme::Theme;
