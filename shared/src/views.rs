//! Assembling the live and history views from raw payloads

use chrono::FixedOffset;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    classify, trend, ChartSeries, HistoryView, HumidityGauge, LiveSample, LiveView, Reading,
};
use crate::normalize::normalize;
use crate::resolve::{resolve_all, resolve_live_at};
use crate::types::Metric;
use crate::window::windowed;

/// Trend arrows and mood for one live sample
pub fn live_view(sample: LiveSample) -> LiveView {
    let metric_trend = |metric| trend(sample.value(metric), sample.previous(metric));
    LiveView {
        temperature_trend: metric_trend(Metric::Temperature),
        humidity_trend: metric_trend(Metric::Humidity),
        mood: classify(sample.temperature, sample.humidity),
        sample,
    }
}

/// Live view from the `latest` endpoint payload; `server_offset` is the
/// sensor server's local offset, used for its `dd/mm/yyyy` timestamps
pub fn build_live_view(
    payload: &Value,
    server_offset: FixedOffset,
) -> PipelineResult<LiveView> {
    let record = payload
        .as_object()
        .ok_or_else(|| PipelineError::Format("latest payload is not an object".to_string()))?;
    Ok(live_view(resolve_live_at(record, server_offset)?))
}

/// Window the readings and build both chart series plus the humidity gauge
pub fn history_view(readings: &[Reading], window_size: usize, offset: FixedOffset) -> HistoryView {
    let window = windowed(readings, window_size);
    let temperature = ChartSeries::build(window, Metric::Temperature, offset);
    let humidity = ChartSeries::build(window, Metric::Humidity, offset);
    let gauge = humidity.last_value().map(HumidityGauge::for_humidity);

    HistoryView {
        readings: window.to_vec(),
        temperature,
        humidity,
        gauge,
    }
}

/// History view from the list endpoint payload, whatever its shape
pub fn build_history_view(
    payload: &Value,
    window_size: usize,
    offset: FixedOffset,
) -> PipelineResult<HistoryView> {
    let records = normalize(payload)?;
    let readings = resolve_all(&records)?;
    Ok(history_view(&readings, window_size, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HumidityLevel, Mood, TrendDirection};
    use serde_json::json;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_build_live_view() {
        let view = build_live_view(&json!({
            "temperature": 3.0,
            "humidity": 80.0,
            "timestamp": "2024-01-10T06:00:00+00:00",
            "prev_temp": 4.0,
            "prev_hum": 80.0
        }), utc())
        .unwrap();

        assert_eq!(view.mood.mood, Mood::Freezing);
        assert_eq!(view.temperature_trend.direction, TrendDirection::Down);
        assert_eq!(view.humidity_trend.direction, TrendDirection::Flat);
    }

    #[test]
    fn test_build_live_view_first_reading_has_no_arrows() {
        let view = build_live_view(&json!({
            "temp": 20, "hum": 60, "prev_temp": null, "prev_hum": null
        }), utc())
        .unwrap();
        assert_eq!(view.mood.mood, Mood::Neutral);
        assert_eq!(view.temperature_trend.direction, TrendDirection::None);
        assert_eq!(view.humidity_trend.direction, TrendDirection::None);
    }

    #[test]
    fn test_build_live_view_rejects_non_object() {
        assert_eq!(
            build_live_view(&json!([1, 2]), utc()).unwrap_err().code(),
            "FORMAT_ERROR"
        );
        assert_eq!(
            build_live_view(&json!({"detail": "Pas de données"}), utc()).unwrap_err(),
            PipelineError::MissingField("temperature")
        );
    }

    #[test]
    fn test_build_history_view_windows_and_gauges() {
        let data: Vec<Value> = (0..25)
            .map(|i| {
                json!({
                    "temp": 20 + i,
                    "hum": 40 + i,
                    "dt": format!("2024-05-01T10:{:02}:00Z", i)
                })
            })
            .collect();

        let view = build_history_view(&json!({ "data": data }), 20, utc()).unwrap();
        assert_eq!(view.readings.len(), 20);
        assert_eq!(view.temperature.values.first(), Some(&25.0));
        assert_eq!(view.temperature.labels.first().map(String::as_str), Some("10:05"));
        assert_eq!(view.humidity.last_value(), Some(64.0));
        assert_eq!(view.gauge.unwrap().level, HumidityLevel::Comfortable);
    }

    #[test]
    fn test_build_history_view_empty_list() {
        let view = build_history_view(&json!({"results": []}), 20, utc()).unwrap();
        assert!(view.temperature.values.is_empty());
        assert!(view.gauge.is_none());
    }

    #[test]
    fn test_build_history_view_propagates_errors() {
        assert_eq!(
            build_history_view(&json!({"detail": "x"}), 20, utc()).unwrap_err(),
            PipelineError::Format("no list found".to_string())
        );
        assert_eq!(
            build_history_view(&json!([{"temp": 1, "hum": 2, "dt": "??"}]), 20, utc())
                .unwrap_err()
                .code(),
            "TIME_PARSE_ERROR"
        );
    }
}
