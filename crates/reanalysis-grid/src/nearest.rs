//! Nearest-cell point extraction.

use std::collections::BTreeMap;

use ndarray::s;
use tracing::debug;

use crate::dataset::{GridDataset, GridVariable};
use crate::error::{ReanalysisError, Result};

/// Reduce the dataset to the single grid cell nearest the target
/// coordinates.
///
/// Latitude and longitude matches are computed independently per axis,
/// not jointly by geographic distance, so the result can differ from the
/// true nearest neighbor near cell boundaries when the axis spacings
/// differ. Exact ties take the lower index. Targets outside the axis
/// range clamp to the nearest edge.
///
/// The returned dataset keeps every variable and the full time axis, with
/// the lat and lon axes reduced to the matched coordinate.
pub fn nearest_point(dataset: &GridDataset, lat: f64, lon: f64) -> Result<GridDataset> {
    let y = nearest_index(dataset.lat(), lat).ok_or_else(|| empty_axis("lat"))?;
    let x = nearest_index(dataset.lon(), lon).ok_or_else(|| empty_axis("lon"))?;

    let matched_lat = dataset.lat()[y];
    let matched_lon = dataset.lon()[x];
    debug!(
        target_lat = lat,
        target_lon = lon,
        matched_lat = matched_lat,
        matched_lon = matched_lon,
        "Matched nearest grid cell"
    );

    let mut variables = BTreeMap::new();
    for (name, var) in dataset.variables() {
        let data = var.data.slice(s![.., y..y + 1, x..x + 1]).to_owned();
        variables.insert(
            name.to_string(),
            GridVariable {
                units: var.units.clone(),
                data,
            },
        );
    }

    GridDataset::new(
        vec![matched_lat],
        vec![matched_lon],
        dataset.time().to_vec(),
        variables,
    )
}

fn empty_axis(coordinate: &str) -> ReanalysisError {
    ReanalysisError::MissingCoordinate {
        coordinate: coordinate.to_string(),
        context: "dataset".to_string(),
    }
}

/// Index of the axis value closest to the target; the first minimum wins
/// on exact ties. `None` for an empty axis.
fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in axis.iter().enumerate() {
        let distance = (value - target).abs();
        match best {
            Some((_, shortest)) if distance >= shortest => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}
