//! Row normalization helpers
//!
//! Speaker lists are split on `,` or `;`. Dates and 12-hour times are folded
//! into sortable `YYYY-MM-DD` / `YYYY-MM-DD HH:MM` strings.

use chrono::{NaiveDate, NaiveTime};
use crate::{Error, Result};

/// Fixed 12-hour input format for start/end times, e.g. `09:30 AM`
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Storage format for dates
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Storage format for combined date + time timestamps
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Split a raw speakers cell into trimmed, non-empty names, preserving order.
pub fn split_speakers(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a date cell. Empty input yields `None`.
///
/// Accepts `MM/DD/YYYY`, `MM/DD/YY` and `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let format = if raw.contains('/') {
        match raw.rsplit('/').next() {
            Some(year) if year.len() == 2 => "%m/%d/%y",
            _ => "%m/%d/%Y",
        }
    } else {
        "%Y-%m-%d"
    };

    NaiveDate::parse_from_str(raw, format)
        .map(Some)
        .map_err(|e| Error::InvalidTimestamp {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a 12-hour time cell. Empty input yields `None`.
pub fn parse_time(raw: &str) -> Result<Option<NaiveTime>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .map(Some)
        .map_err(|e| Error::InvalidTimestamp {
            value: raw.to_string(),
            reason: format!("expected a time like '09:30 AM' ({})", e),
        })
}

/// A date with its start and end timestamps, ready to store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
}

/// Normalize a (date, start, end) triple.
///
/// Times are combined with the row's date; a time without a date is an error.
pub fn normalize_schedule(date: &str, time_start: &str, time_end: &str) -> Result<Schedule> {
    let day = parse_date(date)?;

    let timestamp = |raw: &str| -> Result<String> {
        match (parse_time(raw)?, day) {
            (None, _) => Ok(String::new()),
            (Some(time), Some(day)) => Ok(day.and_time(time).format(TIMESTAMP_OUTPUT_FORMAT).to_string()),
            (Some(_), None) => Err(Error::InvalidTimestamp {
                value: raw.trim().to_string(),
                reason: "time given without a date".to_string(),
            }),
        }
    };

    Ok(Schedule {
        date: day
            .map(|d| d.format(DATE_OUTPUT_FORMAT).to_string())
            .unwrap_or_default(),
        time_start: timestamp(time_start)?,
        time_end: timestamp(time_end)?,
    })
}
