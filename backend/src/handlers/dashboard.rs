//! HTTP handlers for the published dashboard state

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use shared::DashboardSnapshot;

use crate::error::{AppError, AppResult};
use crate::services::export::{ExportService, HISTORY_CSV_FILENAME};
use crate::AppState;

/// Get the snapshot published by the last tick
pub async fn get_state(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    let snapshot = state.snapshots.borrow().clone();
    Json(snapshot)
}

/// Download the charted history window as CSV
pub async fn export_history_csv(State(state): State<AppState>) -> AppResult<Response> {
    let csv = {
        let snapshot = state.snapshots.borrow();
        let view = snapshot.history.view().ok_or(AppError::HistoryUnavailable)?;
        ExportService::history_csv(view)?
    };

    let disposition = format!("attachment; filename=\"{}\"", HISTORY_CSV_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
