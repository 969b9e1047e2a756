//! Aggregation pipeline for compressed sensor exports.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, info};

use enviro_common::{discover_files, parse_timestamp};

use crate::error::{Result, SensorTableError};
use crate::record::{RawReading, REQUIRED_COLUMNS};
use crate::table::{forward_fill, MetadataColumns, PollutantTable};

/// File name suffix of compressed sensor exports.
pub const FILE_SUFFIX: &str = ".csv.gz";

/// Label applied to the value column of the output table.
pub const POLLUTANT_LABEL: &str = "pm2.5";

/// Lower bound of plausible readings (exclusive).
pub const VALUE_FLOOR: f64 = 0.0;

/// Upper bound of plausible readings (exclusive).
pub const VALUE_CEILING: f64 = 900.0;

/// Aggregate every `.csv.gz` sensor export under `root` into one cleaned
/// PM2.5 table.
///
/// Files are discovered recursively and concatenated in sorted-path order.
/// Readings outside the open interval (0, 900) are removed, remaining gaps
/// are forward-filled, and the result is indexed by timestamp. When
/// `keep_metadata` is false the station metadata columns (`location_id`,
/// `sensors_id`, `lat`, `lon`, `parameter`, `units`, `location`) are
/// dropped.
///
/// Fails if no matching files exist, if any file lacks a `datetime` or
/// `value` column, or if any file cannot be parsed. A single bad file
/// aborts the whole aggregation.
pub fn load_pm25(root: impl AsRef<Path>, keep_metadata: bool) -> Result<PollutantTable> {
    let root = root.as_ref();

    let files = discover_files(root, FILE_SUFFIX)?;
    if files.is_empty() {
        return Err(SensorTableError::NoFilesFound(root.display().to_string()));
    }

    info!(
        files = files.len(),
        root = %root.display(),
        "Aggregating sensor readings"
    );

    let mut rows: Vec<RawReading> = Vec::new();
    for file in &files {
        let readings = read_export(file)?;
        debug!(file = %file.display(), rows = readings.len(), "Read sensor export");
        rows.extend(readings);
    }

    let total = rows.len();
    rows.retain(|row| row.value_in_range(VALUE_FLOOR, VALUE_CEILING));
    debug!(
        kept = rows.len(),
        dropped = total - rows.len(),
        "Applied value-range filter"
    );

    // Split the surviving rows into columns. The value column is dense by
    // construction: a missing value cannot pass the range filter.
    let mut datetimes: Vec<Option<String>> = Vec::with_capacity(rows.len());
    let mut values: Vec<f64> = Vec::with_capacity(rows.len());
    let mut metadata = keep_metadata.then(MetadataColumns::default);

    for row in rows {
        let Some(value) = row.value else { continue };
        datetimes.push(row.datetime);
        values.push(value);

        if let Some(meta) = metadata.as_mut() {
            meta.location_id.push(row.location_id);
            meta.sensors_id.push(row.sensors_id);
            meta.lat.push(row.lat);
            meta.lon.push(row.lon);
            meta.parameter.push(row.parameter);
            meta.units.push(row.units);
            meta.location.push(row.location);
        }
    }

    // Gap filling runs after the range filter, so readings removed as
    // implausible are treated as gaps and inherit the prior valid cell.
    forward_fill(&mut datetimes);
    if let Some(meta) = metadata.as_mut() {
        meta.forward_fill();
    }

    let mut index = Vec::with_capacity(datetimes.len());
    for (row, cell) in datetimes.iter().enumerate() {
        match cell {
            Some(s) => index.push(parse_timestamp(s)?),
            None => return Err(SensorTableError::MissingTimestamp { row }),
        }
    }

    info!(rows = index.len(), pollutant = POLLUTANT_LABEL, "Built pollutant table");

    Ok(PollutantTable::new(POLLUTANT_LABEL, index, values, metadata))
}

/// Read one gzip-compressed CSV export into raw rows.
///
/// The header must contain every required column; columns outside the
/// [`RawReading`] schema are ignored.
fn read_export(path: &Path) -> Result<Vec<RawReading>> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut reader = csv::Reader::from_reader(decoder);

    let headers = reader
        .headers()
        .map_err(|e| SensorTableError::CsvParse {
            file: path.display().to_string(),
            source: e,
        })?
        .clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(SensorTableError::MissingColumn {
                file: path.display().to_string(),
                column: required.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawReading = result.map_err(|e| SensorTableError::CsvParse {
            file: path.display().to_string(),
            source: e,
        })?;
        rows.push(row);
    }

    Ok(rows)
}
