//! Timestamp parsing for sensor and reanalysis data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Error raised when a timestamp string cannot be interpreted.
#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("unrecognized timestamp format: {0}")]
    InvalidFormat(String),
}

/// Parse a timestamp string into a UTC datetime.
///
/// Accepts RFC 3339 (with offset), naive date-times with a `T` or space
/// separator, and bare dates (interpreted as midnight). Offsets are
/// converted to UTC; naive values are assumed to already be UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();

    // Full datetime with timezone offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Naive datetime, "T" or space separated (assume UTC)
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let ndt = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}
