//! Multi-file loading and by-coordinate combination.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::{s, Array3};
use tracing::{debug, info};

use enviro_common::discover_files;

use crate::chunk::ChunkSpec;
use crate::dataset::{GridDataset, GridVariable};
use crate::error::{ReanalysisError, Result};
use crate::reader::{read_slab, FileSlab};

/// File name suffix of reanalysis files.
pub const FILE_SUFFIX: &str = ".nc";

/// Load every `.nc` file under `root` into one combined dataset.
///
/// Files are combined by coordinates: all files must agree exactly on the
/// lat and lon axes and carry the same variables; their time steps are
/// merged into one ascending time axis. `chunks` bounds how much data each
/// underlying read pulls at once without changing the result. `variables`,
/// when given, narrows the combined dataset to only those names.
///
/// Fails if no files match, if axes cannot be reconciled, if a timestamp
/// appears in more than one file, or if a requested variable is absent.
pub fn load_dataset(
    root: impl AsRef<Path>,
    chunks: Option<&ChunkSpec>,
    variables: Option<&[&str]>,
) -> Result<GridDataset> {
    let root = root.as_ref();

    let files = discover_files(root, FILE_SUFFIX)?;
    if files.is_empty() {
        return Err(ReanalysisError::NoFilesFound(root.display().to_string()));
    }

    info!(
        files = files.len(),
        root = %root.display(),
        "Combining reanalysis files"
    );

    let mut slabs = Vec::with_capacity(files.len());
    for file in &files {
        slabs.push(read_slab(file, chunks)?);
    }

    let combined = combine_by_coords(&files, slabs)?;

    let dataset = match variables {
        Some(names) => combined.select_variables(names)?,
        None => combined,
    };

    info!(
        variables = dataset.variable_names().len(),
        times = dataset.time().len(),
        "Combined dataset ready"
    );

    Ok(dataset)
}

/// Merge per-file slabs along the time axis, matching shared lat/lon axes.
fn combine_by_coords(paths: &[PathBuf], slabs: Vec<FileSlab>) -> Result<GridDataset> {
    let first = &slabs[0];
    let lat = first.lat.clone();
    let lon = first.lon.clone();
    let names: Vec<String> = first.variables.keys().cloned().collect();

    for (path, slab) in paths.iter().zip(&slabs).skip(1) {
        if slab.lat != lat {
            return Err(ReanalysisError::CoordinateMismatch {
                file: path.display().to_string(),
                axis: "lat".to_string(),
            });
        }
        if slab.lon != lon {
            return Err(ReanalysisError::CoordinateMismatch {
                file: path.display().to_string(),
                axis: "lon".to_string(),
            });
        }
    }

    for (path, slab) in paths.iter().zip(&slabs) {
        for name in &names {
            if !slab.variables.contains_key(name) {
                return Err(ReanalysisError::MissingVariable(format!(
                    "{} (absent from {})",
                    name,
                    path.display()
                )));
            }
        }
        for name in slab.variables.keys() {
            if !names.contains(name) {
                return Err(ReanalysisError::MissingVariable(format!(
                    "{} (absent from {})",
                    name,
                    paths[0].display()
                )));
            }
        }
    }

    // Global time order across all files. The sort is stable, so equal
    // timestamps stay adjacent and the duplicate check below sees them.
    let mut entries: Vec<(DateTime<Utc>, usize, usize)> = Vec::new();
    for (slab_idx, slab) in slabs.iter().enumerate() {
        for (row_idx, t) in slab.time.iter().enumerate() {
            entries.push((*t, slab_idx, row_idx));
        }
    }
    entries.sort_by_key(|entry| entry.0);

    for pair in entries.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(ReanalysisError::DuplicateTime(pair[0].0.to_rfc3339()));
        }
    }

    let time: Vec<_> = entries.iter().map(|entry| entry.0).collect();
    let shape = (time.len(), lat.len(), lon.len());

    let mut variables = BTreeMap::new();
    for name in names {
        let units = first.variables[&name].units.clone();

        let mut data = Array3::<f64>::zeros(shape);
        for (global, (_, slab_idx, row_idx)) in entries.iter().enumerate() {
            let source = &slabs[*slab_idx].variables[&name].data;
            data.slice_mut(s![global, .., ..])
                .assign(&source.slice(s![*row_idx, .., ..]));
        }

        variables.insert(name, GridVariable { units, data });
    }

    debug!(times = time.len(), "Merged time axes");

    GridDataset::new(lat, lon, time, variables)
}
