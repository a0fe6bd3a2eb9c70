//! Humidity-only gauge shown next to the humidity history chart

use serde::{Deserialize, Serialize};

pub const DAMP_MIN_HUMIDITY: f64 = 70.0;
pub const DRY_MAX_HUMIDITY: f64 = 30.0;

/// Comfort level derived from humidity alone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HumidityLevel {
    /// 70 % and above
    Damp,
    /// 30 % and below
    Dry,
    Comfortable,
}

/// Classify humidity; the damp check runs first
pub fn classify_humidity(humidity: f64) -> HumidityLevel {
    if humidity >= DAMP_MIN_HUMIDITY {
        HumidityLevel::Damp
    } else if humidity <= DRY_MAX_HUMIDITY {
        HumidityLevel::Dry
    } else {
        HumidityLevel::Comfortable
    }
}

/// Presentation of the humidity gauge widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HumidityGauge {
    pub level: HumidityLevel,
    pub humidity: f64,
    pub icon: String,
    /// Animation class applied to the icon
    pub animation: String,
    pub status: String,
    pub color: String,
    pub description: String,
}

impl HumidityGauge {
    pub fn for_humidity(humidity: f64) -> Self {
        let level = classify_humidity(humidity);
        let (icon, animation, status, color, description) = match level {
            HumidityLevel::Damp => (
                "fa-umbrella",
                "floating",
                "ÇA MOUILLE !",
                "#3498db",
                "Humidité élevée.",
            ),
            HumidityLevel::Dry => ("fa-sun", "drying", "C'EST SEC...", "#e67e22", "Air sec."),
            HumidityLevel::Comfortable => (
                "fa-cloud-sun",
                "floating",
                "CONFORTABLE",
                "#2ecc71",
                "Air agréable.",
            ),
        };

        Self {
            level,
            humidity,
            icon: icon.to_string(),
            animation: animation.to_string(),
            status: status.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    }
}
