//! Single-file NetCDF reading.
//!
//! Reads one reanalysis file into an in-memory slab: coordinate axes plus
//! every variable shaped (time, lat, lon). Fill values become NaN and
//! packed variables are unpacked via their `scale_factor` / `add_offset`
//! attributes before anything downstream sees the data.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::{s, Array3};
use tracing::debug;

use crate::chunk::ChunkSpec;
use crate::dataset::GridVariable;
use crate::error::{ReanalysisError, Result};
use crate::time::decode_cf_times;

/// Accepted names for the latitude coordinate variable.
const LAT_ALIASES: [&str; 2] = ["lat", "latitude"];

/// Accepted names for the longitude coordinate variable.
const LON_ALIASES: [&str; 2] = ["lon", "longitude"];

/// Name of the time coordinate variable.
const TIME_NAME: &str = "time";

/// The contents of one source file.
#[derive(Debug)]
pub(crate) struct FileSlab {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub time: Vec<DateTime<Utc>>,
    pub variables: BTreeMap<String, GridVariable>,
}

/// Read one NetCDF file into a slab.
///
/// Variables whose dimensions are not exactly (time, lat, lon), such as
/// bounds arrays, scalars, and the coordinates themselves, are skipped.
pub(crate) fn read_slab(path: &Path, chunks: Option<&ChunkSpec>) -> Result<FileSlab> {
    let file_label = path.display().to_string();

    let nc = netcdf::open(path).map_err(|e| ReanalysisError::NetCdf {
        file: file_label.clone(),
        message: e.to_string(),
    })?;

    let lat_name = find_coordinate(&nc, &LAT_ALIASES).ok_or_else(|| missing("lat", &file_label))?;
    let lon_name = find_coordinate(&nc, &LON_ALIASES).ok_or_else(|| missing("lon", &file_label))?;
    if nc.variable(TIME_NAME).is_none() {
        return Err(missing(TIME_NAME, &file_label));
    }

    if let Some(spec) = chunks {
        for dim in spec.dims() {
            if dim != TIME_NAME && dim != lat_name && dim != lon_name {
                return Err(ReanalysisError::UnknownChunkDimension(dim.to_string()));
            }
        }
    }

    let lat = read_axis(&nc, lat_name, &file_label)?;
    let lon = read_axis(&nc, lon_name, &file_label)?;
    let time = read_time_axis(&nc, &file_label)?;

    let mut variables = BTreeMap::new();
    for var in nc.variables() {
        let name = var.name();
        if name == lat_name || name == lon_name || name == TIME_NAME {
            continue;
        }

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let is_gridded = dims.len() == 3
            && dims[0] == TIME_NAME
            && dims[1] == lat_name
            && dims[2] == lon_name;
        if !is_gridded {
            debug!(file = %file_label, variable = %name, dims = ?dims, "Skipping non-gridded variable");
            continue;
        }

        let shape = (time.len(), lat.len(), lon.len());
        let mut data = read_variable(&var, shape, chunks, &file_label)?;
        unpack(&var, &mut data);

        let units = get_string_attr(&var, "units");
        variables.insert(name, GridVariable { units, data });
    }

    debug!(
        file = %file_label,
        variables = variables.len(),
        times = time.len(),
        "Read reanalysis file"
    );

    Ok(FileSlab {
        lat,
        lon,
        time,
        variables,
    })
}

/// Find the first coordinate variable matching one of the accepted names.
fn find_coordinate<'a>(nc: &netcdf::File, aliases: &[&'a str]) -> Option<&'a str> {
    aliases
        .iter()
        .find(|name| nc.variable(name).is_some())
        .copied()
}

fn missing(coordinate: &str, file: &str) -> ReanalysisError {
    ReanalysisError::MissingCoordinate {
        coordinate: coordinate.to_string(),
        context: file.to_string(),
    }
}

/// Read a 1-D coordinate axis as f64.
fn read_axis(nc: &netcdf::File, name: &str, file: &str) -> Result<Vec<f64>> {
    let var = nc
        .variable(name)
        .ok_or_else(|| missing(name, file))?;

    var.get_values::<f64, _>(..)
        .map_err(|e| ReanalysisError::NetCdf {
            file: file.to_string(),
            message: format!("failed to read '{name}': {e}"),
        })
}

/// Read and decode the time axis from its CF units attribute.
fn read_time_axis(nc: &netcdf::File, file: &str) -> Result<Vec<DateTime<Utc>>> {
    let var = nc
        .variable(TIME_NAME)
        .ok_or_else(|| missing(TIME_NAME, file))?;

    let offsets = var
        .get_values::<f64, _>(..)
        .map_err(|e| ReanalysisError::NetCdf {
            file: file.to_string(),
            message: format!("failed to read 'time': {e}"),
        })?;

    let units = get_string_attr(&var, "units").ok_or_else(|| {
        ReanalysisError::InvalidTime(format!("time variable in {file} has no units attribute"))
    })?;

    decode_cf_times(&offsets, &units)
}

/// Read one gridded variable, block by block when a chunk spec is given.
fn read_variable(
    var: &netcdf::Variable,
    shape: (usize, usize, usize),
    chunks: Option<&ChunkSpec>,
    file: &str,
) -> Result<Array3<f64>> {
    let (nt, ny, nx) = shape;

    let read_error = |e: netcdf::Error| ReanalysisError::NetCdf {
        file: file.to_string(),
        message: format!("failed to read '{}': {}", var.name(), e),
    };

    let Some(spec) = chunks else {
        let values = var.get_values::<f64, _>(..).map_err(read_error)?;
        return Array3::from_shape_vec(shape, values)
            .map_err(|e| ReanalysisError::ShapeMismatch(e.to_string()));
    };

    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let block_t = block_size(spec, &dims[0], nt)?;
    let block_y = block_size(spec, &dims[1], ny)?;
    let block_x = block_size(spec, &dims[2], nx)?;

    let mut data = Array3::<f64>::zeros(shape);
    for t0 in (0..nt).step_by(block_t) {
        let t1 = (t0 + block_t).min(nt);
        for y0 in (0..ny).step_by(block_y) {
            let y1 = (y0 + block_y).min(ny);
            for x0 in (0..nx).step_by(block_x) {
                let x1 = (x0 + block_x).min(nx);

                let values = var
                    .get_values::<f64, _>((t0..t1, y0..y1, x0..x1))
                    .map_err(read_error)?;
                let block = Array3::from_shape_vec((t1 - t0, y1 - y0, x1 - x0), values)
                    .map_err(|e| ReanalysisError::ShapeMismatch(e.to_string()))?;

                data.slice_mut(s![t0..t1, y0..y1, x0..x1]).assign(&block);
            }
        }
    }

    Ok(data)
}

/// Resolve the read block size for one dimension.
fn block_size(spec: &ChunkSpec, dim: &str, len: usize) -> Result<usize> {
    match spec.get(dim) {
        Some(0) => Err(ReanalysisError::InvalidChunkSize(dim.to_string())),
        Some(size) => Ok(size.min(len).max(1)),
        None => Ok(len.max(1)),
    }
}

/// Apply fill-value masking and scale/offset unpacking in place.
fn unpack(var: &netcdf::Variable, data: &mut Array3<f64>) {
    let fill = get_f64_attr(var, "_FillValue").or_else(|| get_f64_attr(var, "missing_value"));
    let scale = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);

    if fill.is_none() && scale == 1.0 && offset == 0.0 {
        return;
    }

    data.mapv_inplace(|v| {
        if fill.is_some_and(|f| v == f) {
            f64::NAN
        } else {
            v * scale + offset
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let value = var.attribute_value(name)?.ok()?;
    f64::try_from(value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
