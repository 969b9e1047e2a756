//! Combined gridded dataset types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ndarray::Array3;

use enviro_common::BoundingBox;

use crate::error::{ReanalysisError, Result};

/// One named physical variable on the (time, lat, lon) grid.
#[derive(Debug, Clone)]
pub struct GridVariable {
    /// Physical units as recorded in the source files, when present.
    pub units: Option<String>,
    /// Values shaped `[time, lat, lon]`. Missing cells are NaN.
    pub data: Array3<f64>,
}

/// A gridded dataset indexed by latitude, longitude, and time.
///
/// Assembled from one or more source files whose coordinate axes agree;
/// every variable's shape matches the axis lengths and the time axis is
/// ascending after combination.
#[derive(Debug, Clone)]
pub struct GridDataset {
    lat: Vec<f64>,
    lon: Vec<f64>,
    time: Vec<DateTime<Utc>>,
    variables: BTreeMap<String, GridVariable>,
}

impl GridDataset {
    /// Assemble a dataset from axes and variables, validating that every
    /// variable's shape matches the axis lengths.
    pub fn new(
        lat: Vec<f64>,
        lon: Vec<f64>,
        time: Vec<DateTime<Utc>>,
        variables: BTreeMap<String, GridVariable>,
    ) -> Result<Self> {
        let expected = (time.len(), lat.len(), lon.len());
        for (name, var) in &variables {
            if var.data.dim() != expected {
                return Err(ReanalysisError::ShapeMismatch(format!(
                    "variable '{}' has shape {:?} but the axes imply {:?}",
                    name,
                    var.data.dim(),
                    expected
                )));
            }
        }

        Ok(Self {
            lat,
            lon,
            time,
            variables,
        })
    }

    /// The latitude axis.
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    /// The longitude axis.
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// The time axis.
    pub fn time(&self) -> &[DateTime<Utc>] {
        &self.time
    }

    /// Dataset shape as (time, lat, lon) lengths.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.time.len(), self.lat.len(), self.lon.len())
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&GridVariable> {
        self.variables.get(name)
    }

    /// Whether the dataset carries the named variable.
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variable names in sorted order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    /// Iterate over (name, variable) pairs in sorted order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &GridVariable)> {
        self.variables.iter().map(|(name, var)| (name.as_str(), var))
    }

    /// Geographic extent of the coordinate axes, or `None` when either
    /// spatial axis is empty.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let (first_lat, first_lon) = (self.lat.first()?, self.lon.first()?);

        let mut bbox = BoundingBox::new(*first_lon, *first_lat, *first_lon, *first_lat);
        for &lat in &self.lat {
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lat = bbox.max_lat.max(lat);
        }
        for &lon in &self.lon {
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.max_lon = bbox.max_lon.max(lon);
        }

        Some(bbox)
    }

    /// Narrow the dataset to only the named variables.
    ///
    /// A pure projection: retained variables are unchanged. Requesting an
    /// absent name fails.
    pub fn select_variables<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut variables = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            let var = self
                .variables
                .get(name)
                .ok_or_else(|| ReanalysisError::MissingVariable(name.to_string()))?;
            variables.insert(name.to_string(), var.clone());
        }

        Ok(Self {
            lat: self.lat.clone(),
            lon: self.lon.clone(),
            time: self.time.clone(),
            variables,
        })
    }
}
