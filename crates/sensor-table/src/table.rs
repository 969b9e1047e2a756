//! Time-indexed pollutant table.

use chrono::{DateTime, Utc};

/// Metadata columns retained alongside the measurement when requested.
///
/// Each column has the same length as the table index. Cells are `None`
/// only where no preceding row carried a value to forward-fill from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataColumns {
    pub location_id: Vec<Option<String>>,
    pub sensors_id: Vec<Option<String>>,
    pub lat: Vec<Option<f64>>,
    pub lon: Vec<Option<f64>>,
    pub parameter: Vec<Option<String>>,
    pub units: Vec<Option<String>>,
    pub location: Vec<Option<String>>,
}

impl MetadataColumns {
    /// Forward-fill every column in place.
    pub fn forward_fill(&mut self) {
        forward_fill(&mut self.location_id);
        forward_fill(&mut self.sensors_id);
        forward_fill(&mut self.lat);
        forward_fill(&mut self.lon);
        forward_fill(&mut self.parameter);
        forward_fill(&mut self.units);
        forward_fill(&mut self.location);
    }
}

/// A cleaned table of pollutant readings indexed by timestamp.
#[derive(Debug, Clone)]
pub struct PollutantTable {
    pollutant: String,
    index: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    metadata: Option<MetadataColumns>,
}

impl PollutantTable {
    /// Assemble a table from parallel columns.
    ///
    /// The index and value columns must have equal length; metadata
    /// columns, when present, must match as well.
    pub fn new(
        pollutant: impl Into<String>,
        index: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        metadata: Option<MetadataColumns>,
    ) -> Self {
        debug_assert_eq!(index.len(), values.len());
        if let Some(meta) = &metadata {
            debug_assert_eq!(meta.location_id.len(), index.len());
        }
        Self {
            pollutant: pollutant.into(),
            index,
            values,
            metadata,
        }
    }

    /// The label of the value column (e.g. "pm2.5").
    pub fn pollutant(&self) -> &str {
        &self.pollutant
    }

    /// The timestamp index.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// The measurement column.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Retained metadata columns, if retention was requested.
    pub fn metadata(&self) -> Option<&MetadataColumns> {
        self.metadata.as_ref()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over (timestamp, value) rows.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }
}

/// Replace each `None` with the nearest preceding `Some` in the column.
/// Leading `None`s stay in place.
pub fn forward_fill<T: Clone>(column: &mut [Option<T>]) {
    let mut last: Option<T> = None;
    for cell in column.iter_mut() {
        match cell {
            Some(v) => last = Some(v.clone()),
            None => *cell = last.clone(),
        }
    }
}
