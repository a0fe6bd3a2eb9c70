//! Route definitions for the Météo-Blob dashboard

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Snapshot published by the last tick
        .route("/state", get(handlers::get_state))
        // CSV export of the charted window
        .route("/history.csv", get(handlers::export_history_csv))
}
