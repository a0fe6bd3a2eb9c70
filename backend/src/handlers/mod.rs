//! HTTP handlers

pub mod dashboard;
pub mod health;

pub use dashboard::{export_history_csv, get_state};
pub use health::health_check;
