//! Resolving aliased field names into canonical readings
//!
//! The sensor API names the same concept differently depending on the
//! endpoint (`temp` on the list, `temperature` on `latest`). Each concept
//! has an alias table checked in order; an alias counts as present when
//! the key exists with a non-null value, so a reading of `0` is kept.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{LiveSample, RawRecord, Reading};

/// Priority-ordered keys naming one concept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    /// Canonical name, used in errors
    pub field: &'static str,
    pub keys: &'static [&'static str],
}

pub const TEMPERATURE: FieldAliases = FieldAliases {
    field: "temperature",
    keys: &["temp", "temperature"],
};

pub const HUMIDITY: FieldAliases = FieldAliases {
    field: "humidity",
    keys: &["hum", "humidity"],
};

pub const TIMESTAMP: FieldAliases = FieldAliases {
    field: "timestamp",
    keys: &["dt", "timestamp", "last_dt"],
};

pub const PREV_TEMPERATURE: FieldAliases = FieldAliases {
    field: "prev_temp",
    keys: &["prev_temp", "prev_temperature"],
};

pub const PREV_HUMIDITY: FieldAliases = FieldAliases {
    field: "prev_hum",
    keys: &["prev_hum", "prev_humidity"],
};

/// Naive ISO layouts accepted after RFC 3339; read as UTC
const NAIVE_ISO_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Layout of `last_dt`, rendered in the sensor server's local time
const LOCAL_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

impl FieldAliases {
    /// First alias that is defined, with its value
    pub fn lookup<'a>(&self, record: &'a RawRecord) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| !value.is_null())
    }
}

/// Resolve a history record into a reading; every field is required
pub fn resolve(record: &RawRecord) -> PipelineResult<Reading> {
    let temperature = required_number(record, TEMPERATURE)?;
    let humidity = required_number(record, HUMIDITY)?;
    let raw_ts = TIMESTAMP
        .lookup(record)
        .ok_or(PipelineError::MissingField(TIMESTAMP.field))?;
    let timestamp = parse_timestamp(timestamp_str(raw_ts)?)?;

    Ok(Reading::new(timestamp, temperature, humidity))
}

/// Resolve every record, failing the whole batch on the first bad one
pub fn resolve_all(records: &[RawRecord]) -> PipelineResult<Vec<Reading>> {
    records.iter().map(resolve).collect()
}

/// Resolve the object returned by the `latest` endpoint, with the server on UTC
pub fn resolve_live(record: &RawRecord) -> PipelineResult<LiveSample> {
    resolve_live_at(record, Utc.fix())
}

/// Resolve the object returned by the `latest` endpoint.
///
/// The previous scalars and the timestamp are optional there; an empty
/// timestamp string means the server had no date to report. A `dd/mm/yyyy`
/// timestamp is read at `server_offset`.
pub fn resolve_live_at(
    record: &RawRecord,
    server_offset: FixedOffset,
) -> PipelineResult<LiveSample> {
    let temperature = required_number(record, TEMPERATURE)?;
    let humidity = required_number(record, HUMIDITY)?;
    let prev_temperature = optional_number(record, PREV_TEMPERATURE)?;
    let prev_humidity = optional_number(record, PREV_HUMIDITY)?;

    let timestamp = match TIMESTAMP.lookup(record) {
        None => None,
        Some(raw) => {
            let raw = timestamp_str(raw)?;
            if raw.trim().is_empty() {
                None
            } else {
                Some(parse_timestamp_at(raw, server_offset)?)
            }
        }
    };

    Ok(LiveSample {
        timestamp,
        temperature,
        humidity,
        prev_temperature,
        prev_humidity,
    })
}

/// Parse an upstream timestamp into an instant, with the server on UTC
pub fn parse_timestamp(raw: &str) -> PipelineResult<DateTime<Utc>> {
    parse_timestamp_at(raw, Utc.fix())
}

/// Parse an upstream timestamp into an instant.
///
/// Naive ISO values are UTC; the `dd/mm/yyyy` display layout is local to the
/// server and is read at `server_offset`.
pub fn parse_timestamp_at(
    raw: &str,
    server_offset: FixedOffset,
) -> PipelineResult<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_ISO_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(naive.and_utc());
    }

    NaiveDateTime::parse_from_str(trimmed, LOCAL_DISPLAY_FORMAT)
        .ok()
        .and_then(|naive| server_offset.from_local_datetime(&naive).single())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| PipelineError::TimeParse(raw.to_string()))
}

fn required_number(record: &RawRecord, aliases: FieldAliases) -> PipelineResult<f64> {
    optional_number(record, aliases)?.ok_or(PipelineError::MissingField(aliases.field))
}

fn optional_number(record: &RawRecord, aliases: FieldAliases) -> PipelineResult<Option<f64>> {
    aliases
        .lookup(record)
        .map(|value| to_number(aliases.field, value))
        .transpose()
}

fn to_number(field: &'static str, value: &Value) -> PipelineResult<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        // Decimal columns are serialized as strings
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| PipelineError::InvalidField {
            field,
            value: value.to_string(),
        })
}

fn timestamp_str(value: &Value) -> PipelineResult<&str> {
    value.as_str().ok_or_else(|| PipelineError::InvalidField {
        field: TIMESTAMP.field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_resolve_short_aliases() {
        let r = resolve(&record(json!({
            "temp": 21.5, "hum": 40, "dt": "2024-05-01T10:15:00Z"
        })))
        .unwrap();
        assert_eq!(r.temperature, 21.5);
        assert_eq!(r.humidity, 40.0);
        assert_eq!(r.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 0).unwrap());
    }

    #[test]
    fn test_resolve_long_aliases() {
        let r = resolve(&record(json!({
            "temperature": 18.0, "humidity": 65.5, "timestamp": "2024-05-01T10:15:00+02:00"
        })))
        .unwrap();
        assert_eq!(r.temperature, 18.0);
        assert_eq!(r.humidity, 65.5);
        assert_eq!(r.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_zero_is_defined() {
        let r = resolve(&record(json!({
            "temp": 0, "temperature": 30, "hum": 0.0, "humidity": 90, "dt": "2024-05-01T10:15:00Z"
        })))
        .unwrap();
        assert_eq!(r.temperature, 0.0);
        assert_eq!(r.humidity, 0.0);
    }

    #[test]
    fn test_null_short_alias_falls_back() {
        let r = resolve(&record(json!({
            "temp": null, "temperature": 12.0, "hum": 50, "dt": "2024-05-01T10:15:00Z"
        })))
        .unwrap();
        assert_eq!(r.temperature, 12.0);
    }

    #[test]
    fn test_missing_fields() {
        let err = resolve(&record(json!({"hum": 50, "dt": "2024-05-01T10:15:00Z"}))).unwrap_err();
        assert_eq!(err, PipelineError::MissingField("temperature"));

        let err = resolve(&record(json!({"temp": 20, "dt": "2024-05-01T10:15:00Z"}))).unwrap_err();
        assert_eq!(err, PipelineError::MissingField("humidity"));

        let err = resolve(&record(json!({"temp": 20, "hum": 50}))).unwrap_err();
        assert_eq!(err, PipelineError::MissingField("timestamp"));
    }

    #[test]
    fn test_numeric_strings_and_invalid_values() {
        let r = resolve(&record(json!({
            "temp": "23.40", "hum": " 55 ", "dt": "2024-05-01T10:15:00Z"
        })))
        .unwrap();
        assert_eq!(r.temperature, 23.4);
        assert_eq!(r.humidity, 55.0);

        let err = resolve(&record(json!({
            "temp": true, "hum": 55, "dt": "2024-05-01T10:15:00Z"
        })))
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_FIELD");

        let err = resolve(&record(json!({
            "temp": "NaN", "hum": 55, "dt": "2024-05-01T10:15:00Z"
        })))
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_FIELD");
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:15:30Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01T10:15:30").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01 10:15:30").unwrap(), expected);
        assert_eq!(parse_timestamp("01/05/2024 10:15:30").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-05-01T10:15:30.250000").unwrap(),
            expected + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_display_layout_is_server_local() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 30).unwrap();
        assert_eq!(parse_timestamp_at("01/05/2024 10:15:30", paris).unwrap(), expected);

        // ISO values keep their own meaning whatever the server offset
        assert_eq!(
            parse_timestamp_at("2024-05-01T10:15:30", paris).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap()
        );
        assert_eq!(
            parse_timestamp_at("2024-05-01T10:15:30+02:00", paris).unwrap(),
            expected
        );
    }

    #[test]
    fn test_resolve_live_reads_last_dt_at_server_offset() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let sample = resolve_live_at(
            &record(json!({
                "temperature": 21.0, "humidity": 40.0, "last_dt": "01/05/2024 10:15:30"
            })),
            paris,
        )
        .unwrap();
        assert_eq!(
            sample.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 30).unwrap())
        );
    }

    #[test]
    fn test_unparsable_timestamp() {
        let err = resolve(&record(json!({"temp": 1, "hum": 2, "dt": "yesterday"}))).unwrap_err();
        assert_eq!(err, PipelineError::TimeParse("yesterday".to_string()));
    }

    #[test]
    fn test_resolve_all_fails_whole_batch() {
        let records = vec![
            record(json!({"temp": 1, "hum": 2, "dt": "2024-05-01T10:15:00Z"})),
            record(json!({"temp": 1, "dt": "2024-05-01T10:16:00Z"})),
        ];
        assert_eq!(
            resolve_all(&records),
            Err(PipelineError::MissingField("humidity"))
        );
    }

    #[test]
    fn test_resolve_live_with_previous() {
        let sample = resolve_live(&record(json!({
            "temperature": 22.0,
            "humidity": 45.0,
            "timestamp": "2024-05-01T10:15:00+00:00",
            "prev_temp": 21.0,
            "prev_hum": null
        })))
        .unwrap();
        assert_eq!(sample.temperature, 22.0);
        assert_eq!(sample.prev_temperature, Some(21.0));
        assert_eq!(sample.prev_humidity, None);
        assert!(sample.timestamp.is_some());
    }

    #[test]
    fn test_resolve_live_without_timestamp() {
        let sample = resolve_live(&record(json!({
            "temperature": 0, "humidity": 0, "last_dt": ""
        })))
        .unwrap();
        assert_eq!(sample.timestamp, None);
        assert_eq!(sample.temperature, 0.0);

        let err = resolve_live(&record(json!({
            "temperature": 3, "humidity": 4, "timestamp": "soon"
        })))
        .unwrap_err();
        assert_eq!(err.code(), "TIME_PARSE_ERROR");
    }
}
