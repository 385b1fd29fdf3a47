//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{state::AppState, storage::KeyValueStore};
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router<S: KeyValueStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route(
            "/timers",
            post(add_timers_handler::<S>).get(list_timers_handler::<S>),
        )
        .route("/timers/:index/start", post(start_timer_handler::<S>))
        .route("/timers/:index/pause", post(pause_timer_handler::<S>))
        .route("/timers/:index/reset", post(reset_timer_handler::<S>))
        .route("/categories/:category/start", post(bulk_start_handler::<S>))
        .route("/categories/:category/pause", post(bulk_pause_handler::<S>))
        .route("/categories/:category/reset", post(bulk_reset_handler::<S>))
        .route("/history", get(history_handler::<S>))
        .route("/completion", get(completion_handler::<S>))
        .route("/completion/ack", post(ack_completion_handler::<S>))
        .route(
            "/theme",
            get(get_theme_handler::<S>).put(set_theme_handler::<S>),
        )
        .route("/status", get(status_handler::<S>))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
