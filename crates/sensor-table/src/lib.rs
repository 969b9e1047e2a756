//! Tabular aggregation of air-quality sensor exports.
//!
//! Sensor networks publish hourly readings as gzip-compressed CSV files,
//! one file per station and day, nested under arbitrary date directories.
//! This crate finds every `.csv.gz` file under a root directory,
//! concatenates the rows, removes physically impossible readings, forward
//! fills gaps, and returns one time-indexed table of PM2.5 concentrations.
//!
//! ```no_run
//! let table = sensor_table::load_pm25("/data/openaq/", false)?;
//! println!("{} readings of {}", table.len(), table.pollutant());
//! # Ok::<(), sensor_table::SensorTableError>(())
//! ```

pub mod aggregate;
pub mod error;
pub mod record;
pub mod table;

pub use aggregate::{load_pm25, FILE_SUFFIX, POLLUTANT_LABEL, VALUE_CEILING, VALUE_FLOOR};
pub use error::{Result, SensorTableError};
pub use record::RawReading;
pub use table::{MetadataColumns, PollutantTable};
