//! Error types for reanalysis aggregation.

use thiserror::Error;

/// Errors that can occur while loading or querying gridded data.
#[derive(Error, Debug)]
pub enum ReanalysisError {
    /// No NetCDF files were found under the given root.
    #[error("no .nc files found under {0}")]
    NoFilesFound(String),

    /// Filesystem error while discovering or reading files.
    #[error("failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// The NetCDF library rejected a file or read request.
    #[error("NetCDF error in {file}: {message}")]
    NetCdf { file: String, message: String },

    /// A required coordinate variable is absent.
    #[error("missing coordinate '{coordinate}' in {context}")]
    MissingCoordinate { coordinate: String, context: String },

    /// A requested or expected variable is absent.
    #[error("variable not found: {0}")]
    MissingVariable(String),

    /// A source file's axis does not align with the other files.
    #[error("coordinate '{axis}' in {file} does not align with the other source files")]
    CoordinateMismatch { file: String, axis: String },

    /// The same timestamp appears in more than one source file.
    #[error("duplicate time coordinate {0} across source files")]
    DuplicateTime(String),

    /// A chunk specification names a dimension the files do not have.
    #[error("unknown chunk dimension '{0}'")]
    UnknownChunkDimension(String),

    /// A chunk block size of zero was requested.
    #[error("chunk size for dimension '{0}' must be non-zero")]
    InvalidChunkSize(String),

    /// The time axis could not be decoded.
    #[error("invalid time axis: {0}")]
    InvalidTime(String),

    /// The shape collection contains nothing to mask with.
    #[error("geometry collection contains no usable polygons")]
    EmptyGeometry,

    /// Array dimensions are inconsistent with the coordinate axes.
    #[error("dataset shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Result type for reanalysis operations.
pub type Result<T> = std::result::Result<T, ReanalysisError>;
