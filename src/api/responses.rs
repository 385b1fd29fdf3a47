//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{CompletionNotice, EntryState, TimerEntry};
use crate::storage::Theme;

/// Body for POST /timers. `duration` and `names` arrive as raw strings:
/// the duration must be decimal digits only and `names` may be a
/// comma-separated list, one timer per name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTimersRequest {
    pub category: String,
    pub duration: String,
    pub names: String,
}

/// Body for PUT /theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

/// One entry as presented to clients, addressed by its stable index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub index: usize,
    pub category: String,
    pub name: String,
    pub duration_secs: u64,
    pub remaining_secs: u64,
    pub state: EntryState,
}

impl EntryView {
    pub fn new(index: usize, entry: &TimerEntry) -> Self {
        Self {
            index,
            category: entry.category.clone(),
            name: entry.name.clone(),
            duration_secs: entry.duration_secs,
            remaining_secs: entry.remaining_secs,
            state: entry.state,
        }
    }
}

/// Entries of one category, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub category: String,
    pub entries: Vec<EntryView>,
}

/// Response for GET /timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timestamp: DateTime<Utc>,
    pub total: usize,
    pub running: usize,
    pub categories: Vec<CategoryView>,
}

/// Response for every mutating endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Number of entries the operation changed.
    pub affected: usize,
}

impl MutationResponse {
    pub fn ok(message: String, affected: usize) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            affected,
        }
    }
}

/// Error body returned alongside a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// One row of the history table: the persisted record reduced to the
/// columns the history screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub category: String,
    pub name: String,
    pub duration_secs: u64,
    pub status: EntryState,
}

impl From<&TimerEntry> for HistoryRow {
    fn from(entry: &TimerEntry) -> Self {
        Self {
            category: entry.category.clone(),
            name: entry.name.clone(),
            duration_secs: entry.duration_secs,
            status: entry.state,
        }
    }
}

/// Response for GET /history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub timestamp: DateTime<Utc>,
    pub entries: Vec<HistoryRow>,
}

/// Response for GET /theme and PUT /theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// Response for the completion endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionResponse {
    pub pending: Option<CompletionNotice>,
    pub timestamp: DateTime<Utc>,
}

impl CompletionResponse {
    pub fn new(pending: Option<CompletionNotice>) -> Self {
        Self {
            pending,
            timestamp: Utc::now(),
        }
    }
}

/// Enhanced status response with timer information
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub total_entries: usize,
    pub running_entries: usize,
    pub categories: Vec<String>,
    pub pending_completion: Option<CompletionNotice>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
