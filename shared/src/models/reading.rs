//! Sensor reading models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Metric;

/// One measurement object exactly as the upstream sent it
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Canonical timestamped temperature/humidity pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
        }
    }
}

/// Latest reading plus the previous scalars supplied by the `latest` endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LiveSample {
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature: f64,
    pub humidity: f64,
    pub prev_temperature: Option<f64>,
    pub prev_humidity: Option<f64>,
}

impl LiveSample {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
        }
    }

    pub fn previous(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.prev_temperature,
            Metric::Humidity => self.prev_humidity,
        }
    }
}
