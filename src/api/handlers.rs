//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info};

use crate::{
    error::TimerError,
    state::{parse_duration_secs, split_names, AppState},
    storage::{theme, timers, KeyValueStore},
};

use super::responses::{
    AddTimersRequest, CategoryView, CompletionResponse, EntryView, ErrorResponse, HealthResponse,
    HistoryResponse, HistoryRow, MutationResponse, StatusResponse, ThemeRequest, ThemeResponse,
    TimersResponse,
};

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn reject(err: TimerError) -> ApiError {
    let status = match &err {
        TimerError::Validation(_) => StatusCode::BAD_REQUEST,
        TimerError::IndexOutOfRange(_) => StatusCode::NOT_FOUND,
        TimerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", err);
    }
    (status, Json(ErrorResponse::new(err.to_string())))
}

/// Handle POST /timers - Add one timer per comma-separated name
pub async fn add_timers_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<AddTimersRequest>,
) -> ApiResult<MutationResponse> {
    let duration_secs = parse_duration_secs(&request.duration).map_err(reject)?;
    let names = split_names(&request.names);

    let added = state
        .add_entries(&request.category, duration_secs, &names)
        .map_err(reject)?;

    info!("Add endpoint created {} timer(s)", added.len());
    Ok(Json(MutationResponse::ok(
        format!(
            "Added {} timer(s) to category '{}'",
            added.len(),
            added[0].category
        ),
        added.len(),
    )))
}

/// Handle GET /timers - Snapshot of all timers grouped by category
pub async fn list_timers_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<TimersResponse> {
    // One lock acquisition for both reads: the grouping's indices must
    // address this exact snapshot.
    let (entries, categories) = state.entries_with_categories().map_err(reject)?;
    let categories = categories
        .into_iter()
        .map(|(category, indices)| CategoryView {
            category,
            entries: indices
                .into_iter()
                .map(|index| EntryView::new(index, &entries[index]))
                .collect(),
        })
        .collect();

    Ok(Json(TimersResponse {
        timestamp: Utc::now(),
        total: entries.len(),
        running: entries.iter().filter(|e| e.is_running()).count(),
        categories,
    }))
}

/// Handle POST /timers/:index/start - Resume a single timer
pub async fn start_timer_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(index): Path<usize>,
) -> ApiResult<MutationResponse> {
    let changed = state.start_entry(index).map_err(reject)?;
    Ok(Json(MutationResponse::ok(
        if changed {
            format!("Timer {} started", index)
        } else {
            format!("Timer {} left unchanged", index)
        },
        changed as usize,
    )))
}

/// Handle POST /timers/:index/pause - Pause a single timer
pub async fn pause_timer_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(index): Path<usize>,
) -> ApiResult<MutationResponse> {
    let changed = state.pause_entry(index).map_err(reject)?;
    Ok(Json(MutationResponse::ok(
        if changed {
            format!("Timer {} paused", index)
        } else {
            format!("Timer {} left unchanged", index)
        },
        changed as usize,
    )))
}

/// Handle POST /timers/:index/reset - Reset a single timer
pub async fn reset_timer_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(index): Path<usize>,
) -> ApiResult<MutationResponse> {
    state.reset_entry(index).map_err(reject)?;
    Ok(Json(MutationResponse::ok(
        format!("Timer {} reset", index),
        1,
    )))
}

/// Handle POST /categories/:category/start - Resume every paused timer in
/// a category, preserving progress
pub async fn bulk_start_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(category): Path<String>,
) -> ApiResult<MutationResponse> {
    let affected = state.bulk_start(&category).map_err(reject)?;
    Ok(Json(MutationResponse::ok(
        format!("Started {} timer(s) in category '{}'", affected, category),
        affected,
    )))
}

/// Handle POST /categories/:category/pause - Pause every running timer in
/// a category
pub async fn bulk_pause_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(category): Path<String>,
) -> ApiResult<MutationResponse> {
    let affected = state.bulk_pause(&category).map_err(reject)?;
    Ok(Json(MutationResponse::ok(
        format!("Paused {} timer(s) in category '{}'", affected, category),
        affected,
    )))
}

/// Handle POST /categories/:category/reset - Reset every timer in a category
pub async fn bulk_reset_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(category): Path<String>,
) -> ApiResult<MutationResponse> {
    let affected = state.bulk_reset(&category).map_err(reject)?;
    Ok(Json(MutationResponse::ok(
        format!("Reset {} timer(s) in category '{}'", affected, category),
        affected,
    )))
}

/// Handle GET /history - Read-only projection over the persisted entries
pub async fn history_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HistoryResponse> {
    let entries = timers::load_entries(&state.storage).await;
    Json(HistoryResponse {
        timestamp: Utc::now(),
        entries: entries.iter().map(HistoryRow::from).collect(),
    })
}

/// Handle GET /completion - The pending completion notice, if any
pub async fn completion_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<CompletionResponse> {
    Json(CompletionResponse::new(state.pending_completion()))
}

/// Handle POST /completion/ack - Acknowledge and clear the pending notice
pub async fn ack_completion_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<CompletionResponse> {
    let acknowledged = state.acknowledge_completion();
    if let Some(notice) = &acknowledged {
        info!("Completion of '{}' acknowledged", notice.entry_name);
    }
    Json(CompletionResponse::new(acknowledged))
}

/// Handle GET /theme - The stored display theme
pub async fn get_theme_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<ThemeResponse> {
    let theme = theme::load_theme(&state.storage).await;
    Json(ThemeResponse { theme })
}

/// Handle PUT /theme - Store the display theme
pub async fn set_theme_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<ThemeRequest>,
) -> Json<ThemeResponse> {
    theme::save_theme(&state.storage, request.theme).await;
    info!("Theme set to {:?}", request.theme);
    Json(ThemeResponse {
        theme: request.theme,
    })
}

/// Handle GET /status - Return current server status
pub async fn status_handler<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<StatusResponse> {
    let (entries, categories) = state.entries_with_categories().map_err(reject)?;
    let categories = categories
        .into_iter()
        .map(|(category, _)| category)
        .collect();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        total_entries: entries.len(),
        running_entries: entries.iter().filter(|e| e.is_running()).count(),
        categories,
        pending_completion: state.pending_completion(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
