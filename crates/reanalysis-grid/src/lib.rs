//! Gridded reanalysis aggregation and spatial extraction.
//!
//! Atmospheric reanalysis products ship as one NetCDF file per period,
//! all on the same lat/lon grid. This crate finds every `.nc` file under
//! a root directory, combines them by coordinates into one dataset, and
//! offers two extraction operations:
//!
//! - [`polygon_mean`]: the spatial mean of one variable per time step,
//!   over the grid cells inside an arbitrary polygon collection;
//! - [`nearest_point`]: the dataset reduced to the grid cell nearest a
//!   target coordinate pair.
//!
//! ```no_run
//! use reanalysis_grid::{load_dataset, nearest_point, ChunkSpec};
//!
//! let chunks = ChunkSpec::new().with("time", 24);
//! let dataset = load_dataset("/data/merra2/", Some(&chunks), Some(&["t2m"]))?;
//! let cell = nearest_point(&dataset, 40.7, -74.0)?;
//! println!("{:?}", cell.variable("t2m").map(|v| &v.units));
//! # Ok::<(), reanalysis_grid::ReanalysisError>(())
//! ```

pub mod chunk;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod nearest;
pub mod polygon;
pub mod time;

mod reader;

pub use chunk::ChunkSpec;
pub use dataset::{GridDataset, GridVariable};
pub use error::{ReanalysisError, Result};
pub use loader::{load_dataset, FILE_SUFFIX};
pub use nearest::nearest_point;
pub use polygon::{polygon_mean, AreaMeanSeries};
