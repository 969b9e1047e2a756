//! CF-convention time axis decoding.
//!
//! Reanalysis files record time as numeric offsets from a base datetime,
//! described by a units attribute such as `"minutes since 2023-01-01
//! 00:30:00"`. This module turns those offsets into UTC datetimes.

use chrono::{DateTime, Duration, Utc};

use enviro_common::parse_timestamp;

use crate::error::{ReanalysisError, Result};

/// Parse a CF units string into a base datetime and a multiplier that
/// converts one offset unit into seconds.
pub fn parse_cf_units(units: &str) -> Result<(DateTime<Utc>, f64)> {
    let Some((unit, base)) = units
        .split_once(" since ")
        .or_else(|| units.split_once(" SINCE "))
    else {
        return Err(ReanalysisError::InvalidTime(format!(
            "unrecognized units string '{units}'"
        )));
    };

    let unit = unit.to_lowercase();
    let multiplier = if unit.contains("second") {
        1.0
    } else if unit.contains("minute") {
        60.0
    } else if unit.contains("hour") {
        3600.0
    } else if unit.contains("day") {
        86400.0
    } else {
        return Err(ReanalysisError::InvalidTime(format!(
            "unrecognized offset unit '{unit}'"
        )));
    };

    let base = parse_timestamp(base.trim())
        .map_err(|e| ReanalysisError::InvalidTime(e.to_string()))?;

    Ok((base, multiplier))
}

/// Decode numeric time offsets into UTC datetimes using a CF units string.
pub fn decode_cf_times(offsets: &[f64], units: &str) -> Result<Vec<DateTime<Utc>>> {
    let (base, multiplier) = parse_cf_units(units)?;

    Ok(offsets
        .iter()
        .map(|&offset| base + Duration::milliseconds((offset * multiplier * 1000.0).round() as i64))
        .collect())
}
