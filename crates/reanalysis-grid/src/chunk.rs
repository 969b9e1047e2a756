//! Chunked-read specification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-dimension block sizes for reading variable data.
///
/// Chunking shapes how much data each underlying NetCDF read pulls into
/// memory at once; it never changes the logical result. Dimensions without
/// an entry are read whole.
///
/// ```
/// use reanalysis_grid::ChunkSpec;
///
/// let chunks = ChunkSpec::new().with("time", 24);
/// assert_eq!(chunks.get("time"), Some(24));
/// assert_eq!(chunks.get("lat"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpec(BTreeMap<String, usize>);

impl ChunkSpec {
    /// Create an empty specification (everything read whole).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block size for one dimension.
    pub fn with(mut self, dim: impl Into<String>, size: usize) -> Self {
        self.0.insert(dim.into(), size);
        self
    }

    /// Block size for a dimension, if one was set.
    pub fn get(&self, dim: &str) -> Option<usize> {
        self.0.get(dim).copied()
    }

    /// Dimension names with an explicit block size.
    pub fn dims(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
