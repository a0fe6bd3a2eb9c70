//! Trailing window of readings and the chart series built from it

use chrono::{DateTime, FixedOffset, Utc};

use crate::models::{ChartSeries, Reading};
use crate::types::Metric;

/// Number of readings kept for the history charts
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// The trailing `size` items, or all of them when there are fewer
pub fn windowed<T>(items: &[T], size: usize) -> &[T] {
    let start = items.len().saturating_sub(size);
    &items[start..]
}

/// `HH:MM` label of an instant in the display offset
pub fn time_label(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp.with_timezone(&offset).format("%H:%M").to_string()
}

impl ChartSeries {
    /// Labels and values for one metric, aligned by index
    pub fn build(window: &[Reading], metric: Metric, offset: FixedOffset) -> Self {
        let (labels, values) = window
            .iter()
            .map(|r| (time_label(r.timestamp, offset), r.value(metric)))
            .unzip();

        Self {
            metric,
            label: metric.chart_label().to_string(),
            labels,
            values,
        }
    }
}
