//! Views published to the rendering layer after each poll

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HumidityGauge, LiveSample, MoodState, Reading, Trend};
use crate::types::Metric;

/// Caption of the live card when the latest reading is unavailable
pub const NO_SIGNAL_CAPTION: &str = "Pas de signal...";
/// Status of the history card when the list could not be used
pub const DATA_ERROR_MESSAGE: &str = "Erreur Données";

/// Chart labels and values, aligned by index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub metric: Metric,
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Live card: current values, arrows and mood
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveView {
    pub sample: LiveSample,
    pub temperature_trend: Trend,
    pub humidity_trend: Trend,
    pub mood: MoodState,
}

/// Live card while the latest endpoint cannot be used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackView {
    pub caption: String,
    pub mood: MoodState,
    /// Code of the error that caused the fallback
    pub reason: String,
}

impl FallbackView {
    pub fn no_signal(reason: impl Into<String>) -> Self {
        Self {
            caption: NO_SIGNAL_CAPTION.to_string(),
            mood: MoodState::disconnected(),
            reason: reason.into(),
        }
    }
}

/// History cards: windowed readings, both charts and the humidity gauge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryView {
    pub readings: Vec<Reading>,
    pub temperature: ChartSeries,
    pub humidity: ChartSeries,
    /// Gauge for the most recent humidity; absent for an empty history
    pub gauge: Option<HumidityGauge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LiveState {
    Live(LiveView),
    NoSignal(FallbackView),
}

impl LiveState {
    pub fn is_live(&self) -> bool {
        matches!(self, LiveState::Live(_))
    }

    pub fn mood(&self) -> &MoodState {
        match self {
            LiveState::Live(view) => &view.mood,
            LiveState::NoSignal(view) => &view.mood,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryState {
    /// Nothing fetched yet
    Pending,
    Ready(HistoryView),
    Unavailable { message: String, reason: String },
}

impl HistoryState {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        HistoryState::Unavailable {
            message: DATA_ERROR_MESSAGE.to_string(),
            reason: reason.into(),
        }
    }

    pub fn view(&self) -> Option<&HistoryView> {
        match self {
            HistoryState::Ready(view) => Some(view),
            _ => None,
        }
    }
}

/// Everything one poll publishes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    /// Number of completed ticks; 0 before the first one
    pub tick: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub live: LiveState,
    pub history: HistoryState,
}

impl DashboardSnapshot {
    /// State before the first tick completes
    pub fn initial() -> Self {
        Self {
            tick: 0,
            updated_at: None,
            live: LiveState::NoSignal(FallbackView::no_signal("NOT_POLLED")),
            history: HistoryState::Pending,
        }
    }
}
