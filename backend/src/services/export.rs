//! CSV export of the charted history window

use anyhow::Context;
use serde::Serialize;
use shared::{HistoryView, Reading};

use crate::error::AppResult;

/// Download name of the export
pub const HISTORY_CSV_FILENAME: &str = "historique_dht.csv";

/// Column names, written even when the window is empty
const HISTORY_CSV_HEADER: [&str; 3] = ["timestamp", "temperature", "humidity"];

/// One CSV row
#[derive(Debug, Serialize)]
struct HistoryRow {
    timestamp: String,
    temperature: f64,
    humidity: f64,
}

impl From<&Reading> for HistoryRow {
    fn from(reading: &Reading) -> Self {
        Self {
            timestamp: reading.timestamp.to_rfc3339(),
            temperature: reading.temperature,
            humidity: reading.humidity,
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Render the windowed readings as `timestamp,temperature,humidity` CSV
    pub fn history_csv(view: &HistoryView) -> AppResult<String> {
        let rows: Vec<HistoryRow> = view.readings.iter().map(HistoryRow::from).collect();
        Self::export_to_csv(&HISTORY_CSV_HEADER, &rows)
    }

    /// Export data to CSV format under an explicit header row
    fn export_to_csv<T: Serialize>(header: &[&str], data: &[T]) -> AppResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        wtr.write_record(header).context("CSV header error")?;
        for record in data {
            wtr.serialize(record).context("CSV serialization error")?;
        }
        let bytes = wtr.into_inner().context("CSV writer error")?;
        Ok(String::from_utf8(bytes).context("UTF-8 conversion error")?)
    }
}
