//! Recursive file discovery for data directory trees.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively collect every file under `root` whose name ends with
/// `suffix` (e.g. `".csv.gz"` or `".nc"`), at any depth.
///
/// The returned list is sorted lexicographically so that aggregation order
/// is deterministic regardless of directory iteration order.
pub fn discover_files(root: impl AsRef<Path>, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root.as_ref()) {
        let entry = entry.map_err(io::Error::from)?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(suffix))
            .unwrap_or(false);

        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
