//! Integration tests: create real NetCDF files and combine them.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use geo::{LineString, MultiPolygon, Polygon};

use reanalysis_grid::{
    load_dataset, nearest_point, polygon_mean, ChunkSpec, ReanalysisError,
};

const LAT: [f64; 3] = [10.0, 20.0, 30.0];
const LON: [f64; 3] = [10.0, 20.0, 30.0];

/// Write one reanalysis file with `t2m` and `q500` variables.
///
/// `t2m` at (t, y, x) is `offset(t) * 100 + y * 10 + x`; `q500` is the
/// same shifted by 0.5, so values are predictable across files.
fn write_reanalysis(path: &Path, time_units: &str, time_offsets: &[f64]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture dirs");
    }

    let mut file = netcdf::create(path).expect("Failed to create NetCDF file");
    file.add_dimension("time", time_offsets.len()).unwrap();
    file.add_dimension("lat", LAT.len()).unwrap();
    file.add_dimension("lon", LON.len()).unwrap();

    let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
    time.put_attribute("units", time_units).unwrap();
    time.put_values(time_offsets, ..).unwrap();

    let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
    lat.put_values(&LAT, ..).unwrap();

    let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
    lon.put_values(&LON, ..).unwrap();

    let cell = |offset: f64, y: usize, x: usize| offset * 100.0 + (y * 10 + x) as f64;

    let mut t2m_values = Vec::new();
    let mut q500_values = Vec::new();
    for &offset in time_offsets {
        for y in 0..LAT.len() {
            for x in 0..LON.len() {
                t2m_values.push(cell(offset, y, x));
                q500_values.push(cell(offset, y, x) + 0.5);
            }
        }
    }

    let mut t2m = file
        .add_variable::<f64>("t2m", &["time", "lat", "lon"])
        .unwrap();
    t2m.put_attribute("units", "K").unwrap();
    t2m.put_values(&t2m_values, ..).unwrap();

    let mut q500 = file
        .add_variable::<f64>("q500", &["time", "lat", "lon"])
        .unwrap();
    q500.put_values(&q500_values, ..).unwrap();
}

const UNITS_JAN1: &str = "hours since 2024-01-01 00:00:00";
const UNITS_JAN2: &str = "hours since 2024-01-02 00:00:00";

#[test]
fn test_load_combines_files_into_ascending_time_axis() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    // Later day sorts first by file name; combination must reorder by time.
    write_reanalysis(&dir.path().join("a_day2.nc"), UNITS_JAN2, &[0.0, 1.0]);
    write_reanalysis(
        &dir.path().join("nested").join("day1.nc"),
        UNITS_JAN1,
        &[0.0, 1.0],
    );

    let ds = load_dataset(dir.path(), None, None).unwrap();

    assert_eq!(ds.shape(), (4, 3, 3));
    assert_eq!(ds.variable_names(), vec!["q500", "t2m"]);
    assert_eq!(
        ds.time()[0],
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        ds.time()[3],
        Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap()
    );
    assert!(ds.time().windows(2).all(|pair| pair[0] < pair[1]));

    // Day-1 hour 0 landed first even though its file sorted second.
    let t2m = ds.variable("t2m").unwrap();
    assert_eq!(t2m.data[[0, 0, 0]], 0.0);
    assert_eq!(t2m.data[[1, 2, 1]], 121.0);
    assert_eq!(t2m.units.as_deref(), Some("K"));

    let bbox = ds.bbox().unwrap();
    assert_eq!((bbox.min_lat, bbox.max_lat), (10.0, 30.0));
}

#[test]
fn test_chunked_load_matches_unchunked() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0, 1.0, 2.0]);

    let plain = load_dataset(dir.path(), None, None).unwrap();

    let chunks = ChunkSpec::new().with("time", 2).with("lat", 2).with("lon", 1);
    let chunked = load_dataset(dir.path(), Some(&chunks), None).unwrap();

    assert_eq!(plain.time(), chunked.time());
    for (name, var) in plain.variables() {
        assert_eq!(var.data, chunked.variable(name).unwrap().data);
    }
}

#[test]
fn test_variable_selection_is_pure_projection() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0]);

    let full = load_dataset(dir.path(), None, None).unwrap();
    let selected = load_dataset(dir.path(), None, Some(&["t2m"])).unwrap();

    assert_eq!(selected.variable_names(), vec!["t2m"]);
    assert_eq!(
        selected.variable("t2m").unwrap().data,
        full.variable("t2m").unwrap().data
    );
}

#[test]
fn test_selecting_unknown_variable_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0]);

    let err = load_dataset(dir.path(), None, Some(&["sst"])).unwrap_err();
    assert!(matches!(err, ReanalysisError::MissingVariable(_)));
}

#[test]
fn test_no_files_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = load_dataset(dir.path(), None, None).unwrap_err();
    assert!(matches!(err, ReanalysisError::NoFilesFound(_)));
}

#[test]
fn test_unknown_chunk_dimension_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0]);

    let chunks = ChunkSpec::new().with("level", 4);
    let err = load_dataset(dir.path(), Some(&chunks), None).unwrap_err();
    assert!(matches!(err, ReanalysisError::UnknownChunkDimension(_)));
}

#[test]
fn test_duplicate_time_across_files_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0]);
    write_reanalysis(&dir.path().join("day1_copy.nc"), UNITS_JAN1, &[0.0]);

    let err = load_dataset(dir.path(), None, None).unwrap_err();
    assert!(matches!(err, ReanalysisError::DuplicateTime(_)));
}

#[test]
fn test_mismatched_lat_axis_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0]);

    // Same layout, shifted latitude axis.
    let path = dir.path().join("day2.nc");
    let mut file = netcdf::create(&path).expect("Failed to create NetCDF file");
    file.add_dimension("time", 1).unwrap();
    file.add_dimension("lat", 3).unwrap();
    file.add_dimension("lon", LON.len()).unwrap();
    let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
    time.put_attribute("units", UNITS_JAN2).unwrap();
    time.put_values(&[0.0], ..).unwrap();
    let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
    lat.put_values(&[11.0, 21.0, 31.0], ..).unwrap();
    let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
    lon.put_values(&LON, ..).unwrap();
    let mut t2m = file
        .add_variable::<f64>("t2m", &["time", "lat", "lon"])
        .unwrap();
    t2m.put_values(&[0.0; 9], ..).unwrap();
    let mut q500 = file
        .add_variable::<f64>("q500", &["time", "lat", "lon"])
        .unwrap();
    q500.put_values(&[0.0; 9], ..).unwrap();
    drop(file);

    let err = load_dataset(dir.path(), None, None).unwrap_err();
    match err {
        ReanalysisError::CoordinateMismatch { axis, .. } => assert_eq!(axis, "lat"),
        other => panic!("expected CoordinateMismatch, got {other}"),
    }
}

#[test]
fn test_fill_values_become_nan() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let path = dir.path().join("day1.nc");
    let mut file = netcdf::create(&path).expect("Failed to create NetCDF file");
    file.add_dimension("time", 1).unwrap();
    file.add_dimension("lat", 1).unwrap();
    file.add_dimension("lon", 2).unwrap();
    let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
    time.put_attribute("units", UNITS_JAN1).unwrap();
    time.put_values(&[0.0], ..).unwrap();
    let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
    lat.put_values(&[10.0], ..).unwrap();
    let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
    lon.put_values(&[10.0, 20.0], ..).unwrap();
    let mut t2m = file
        .add_variable::<f64>("t2m", &["time", "lat", "lon"])
        .unwrap();
    t2m.put_attribute("_FillValue", 1.0e15).unwrap();
    t2m.put_values(&[280.0, 1.0e15], ..).unwrap();
    drop(file);

    let ds = load_dataset(dir.path(), None, None).unwrap();
    let t2m = ds.variable("t2m").unwrap();
    assert_eq!(t2m.data[[0, 0, 0]], 280.0);
    assert!(t2m.data[[0, 0, 1]].is_nan());

    // The masked cell stays out of spatial means.
    let everything = MultiPolygon::new(vec![Polygon::new(
        LineString::from(vec![(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0), (0.0, 0.0)]),
        vec![],
    )]);
    let series = polygon_mean(&ds, "t2m", &everything).unwrap();
    assert_eq!(series.values, vec![280.0]);
}

#[test]
fn test_nearest_point_on_loaded_dataset() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0, 1.0]);

    let ds = load_dataset(dir.path(), None, None).unwrap();
    let point = nearest_point(&ds, 18.0, 22.0).unwrap();

    assert_eq!(point.lat(), &[20.0]);
    assert_eq!(point.lon(), &[20.0]);
    // Cell (y=1, x=1) of hour 1: 100 + 11.
    assert_eq!(point.variable("t2m").unwrap().data[[1, 0, 0]], 111.0);
    assert_eq!(point.variable("q500").unwrap().data[[1, 0, 0]], 111.5);
}

#[test]
fn test_polygon_mean_on_loaded_dataset() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_reanalysis(&dir.path().join("day1.nc"), UNITS_JAN1, &[0.0]);

    let ds = load_dataset(dir.path(), None, None).unwrap();

    let whole_domain = MultiPolygon::new(vec![Polygon::new(
        LineString::from(vec![(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0), (0.0, 0.0)]),
        vec![],
    )]);

    let series = polygon_mean(&ds, "t2m", &whole_domain).unwrap();
    // Mean of {y*10 + x} over the 3x3 grid.
    assert_eq!(series.values, vec![11.0]);
    assert_eq!(series.time, ds.time());
}
