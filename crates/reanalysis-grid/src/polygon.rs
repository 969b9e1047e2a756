//! Polygon-averaged extraction.

use chrono::{DateTime, Utc};
use geo::{Contains, MultiPolygon, Point};
use tracing::debug;

use crate::dataset::GridDataset;
use crate::error::{ReanalysisError, Result};

/// Spatial mean of one variable per time step, over a polygon mask.
#[derive(Debug, Clone)]
pub struct AreaMeanSeries {
    /// Name of the averaged variable.
    pub variable: String,
    /// Time axis of the source dataset.
    pub time: Vec<DateTime<Utc>>,
    /// Mean value per time step; NaN where no grid cell is covered.
    pub values: Vec<f64>,
}

impl AreaMeanSeries {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the series has no time steps.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Iterate over (timestamp, mean) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.time.iter().copied().zip(self.values.iter().copied())
    }
}

/// Compute the spatial mean of `variable` over the union of `shapes`,
/// per time step.
///
/// A grid cell participates when its center (lon, lat) lies strictly
/// inside any polygon of the collection. Missing (NaN) cells are excluded
/// from the mean; a time step with no covered cells yields NaN, not zero.
/// A shape that intersects no grid cell therefore returns an all-NaN
/// series rather than an error.
///
/// The mask costs one point-in-polygon test per grid cell on every call;
/// there is no spatial index, which is fine for small-to-moderate grids
/// but will not scale to fine-resolution global ones.
pub fn polygon_mean(
    dataset: &GridDataset,
    variable: &str,
    shapes: &MultiPolygon<f64>,
) -> Result<AreaMeanSeries> {
    let var = dataset
        .variable(variable)
        .ok_or_else(|| ReanalysisError::MissingVariable(variable.to_string()))?;

    if !has_usable_geometry(shapes) {
        return Err(ReanalysisError::EmptyGeometry);
    }

    let (lat, lon) = (dataset.lat(), dataset.lon());
    let (nt, ny, nx) = dataset.shape();

    // Containment of the union is containment by any member polygon.
    let mut mask = vec![false; ny * nx];
    for (y, &cell_lat) in lat.iter().enumerate() {
        for (x, &cell_lon) in lon.iter().enumerate() {
            mask[y * nx + x] = shapes.contains(&Point::new(cell_lon, cell_lat));
        }
    }

    let covered = mask.iter().filter(|&&inside| inside).count();
    debug!(
        variable = variable,
        covered = covered,
        cells = ny * nx,
        "Built polygon mask"
    );

    let mut values = Vec::with_capacity(nt);
    for t in 0..nt {
        let mut sum = 0.0;
        let mut count = 0usize;

        for y in 0..ny {
            for x in 0..nx {
                if !mask[y * nx + x] {
                    continue;
                }
                let v = var.data[[t, y, x]];
                if v.is_nan() {
                    continue;
                }
                sum += v;
                count += 1;
            }
        }

        values.push(if count == 0 { f64::NAN } else { sum / count as f64 });
    }

    Ok(AreaMeanSeries {
        variable: variable.to_string(),
        time: dataset.time().to_vec(),
        values,
    })
}

/// A collection is usable when at least one polygon has a non-empty
/// exterior ring.
fn has_usable_geometry(shapes: &MultiPolygon<f64>) -> bool {
    shapes.0.iter().any(|polygon| !polygon.exterior().0.is_empty())
}
