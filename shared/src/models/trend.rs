//! Trend arrows comparing the current scalar with the previous one

use serde::{Deserialize, Serialize};

/// Direction of change since the previous reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
    /// No previous value; nothing is rendered
    None,
}

impl TrendDirection {
    pub fn arrow(&self) -> Option<&'static str> {
        match self {
            TrendDirection::Up => Some("⬆"),
            TrendDirection::Down => Some("⬇"),
            TrendDirection::Flat => Some("="),
            TrendDirection::None => None,
        }
    }
}

/// Trend of one tracked scalar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Trend {
    pub direction: TrendDirection,
    pub previous: Option<f64>,
}

impl Trend {
    /// Text shown next to the value, e.g. `⬆ Prev: 21.5°C`
    pub fn indicator(&self, unit: &str) -> Option<String> {
        let arrow = self.direction.arrow()?;
        let previous = self.previous?;
        Some(format!("{} Prev: {}{}", arrow, previous, unit))
    }
}

/// Compare `current` against `previous` with exact numeric comparison.
///
/// Incomparable values (NaN on either side) fall through to `Flat`.
pub fn trend(current: f64, previous: Option<f64>) -> Trend {
    let direction = match previous {
        None => TrendDirection::None,
        Some(prev) if current > prev => TrendDirection::Up,
        Some(prev) if current < prev => TrendDirection::Down,
        Some(_) => TrendDirection::Flat,
    };

    Trend {
        direction,
        previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_up_down_flat() {
        assert_eq!(trend(22.0, Some(21.5)).direction, TrendDirection::Up);
        assert_eq!(trend(21.0, Some(21.5)).direction, TrendDirection::Down);
        assert_eq!(trend(21.5, Some(21.5)).direction, TrendDirection::Flat);
    }

    #[test]
    fn test_trend_without_previous() {
        let t = trend(18.0, None);
        assert_eq!(t.direction, TrendDirection::None);
        assert_eq!(t.previous, None);
        assert_eq!(t.indicator("°C"), None);
    }

    #[test]
    fn test_trend_zero_previous_is_a_value() {
        assert_eq!(trend(0.5, Some(0.0)).direction, TrendDirection::Up);
        assert_eq!(trend(0.0, Some(0.0)).direction, TrendDirection::Flat);
    }

    #[test]
    fn test_indicator_text() {
        assert_eq!(
            trend(22.0, Some(21.5)).indicator("°C").as_deref(),
            Some("⬆ Prev: 21.5°C")
        );
        assert_eq!(
            trend(40.0, Some(45.0)).indicator("%").as_deref(),
            Some("⬇ Prev: 45%")
        );
        assert_eq!(
            trend(40.0, Some(40.0)).indicator("%").as_deref(),
            Some("= Prev: 40%")
        );
    }
}
