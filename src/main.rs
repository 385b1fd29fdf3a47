//! Activity Timers - A state-managed HTTP server for countdown timers
//!
//! This is the main entry point for the activity-timers application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use activity_timers::{
    api::create_router,
    config::Config,
    state::AppState,
    storage::{timers, FileStore},
    tasks::{persistence_task, tick_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "activity_timers={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!(
        "Starting activity-timers server v{}",
        env!("CARGO_PKG_VERSION")
    );
    let data_dir = config.resolve_data_dir();
    info!(
        "Configuration: host={}, port={}, data_dir={}",
        config.host,
        config.port,
        data_dir.display()
    );

    // Restore the persisted collection; a missing or malformed value
    // starts the session empty.
    let storage = FileStore::new(data_dir);
    let entries = timers::load_entries(&storage).await;
    info!("Loaded {} stored timer(s)", entries.len());

    // Create application state
    let state = Arc::new(AppState::new(
        entries,
        storage.clone(),
        config.host.clone(),
        config.port,
    ));

    // Start the write-through persistence background task
    let snapshots = state.subscribe_snapshots();
    tokio::spawn(persistence_task(storage, snapshots));

    // Start the shared tick source background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timers                      - Add timers (comma-separated names)");
    info!("  GET  /timers                      - List timers grouped by category");
    info!("  POST /timers/:index/start|pause|reset      - Control one timer");
    info!("  POST /categories/:category/start|pause|reset - Bulk control a category");
    info!("  GET  /history                     - Persisted timer history");
    info!("  GET  /completion                  - Pending completion notice");
    info!("  POST /completion/ack              - Acknowledge the notice");
    info!("  GET/PUT /theme                    - Display theme preference");
    info!("  GET  /status                      - Server status");
    info!("  GET  /health                      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
