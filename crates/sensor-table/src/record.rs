//! Row schema for sensor export files.

use serde::Deserialize;

/// Header columns that must be present in every source file.
pub const REQUIRED_COLUMNS: [&str; 2] = ["datetime", "value"];

/// One sensor observation as it appears in a source file.
///
/// Every field is optional: empty CSV cells deserialize to `None`, and
/// files may omit metadata columns entirely. Columns outside this schema
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub sensors_id: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl RawReading {
    /// Whether the measurement passes the physical plausibility filter:
    /// strictly inside the open interval (floor, ceiling). Missing and
    /// non-finite values fail.
    pub fn value_in_range(&self, floor: f64, ceiling: f64) -> bool {
        match self.value {
            Some(v) => v > floor && v < ceiling,
            None => false,
        }
    }
}
