//! Input directory scanning.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CombineError, CombineResult};

/// Result of scanning the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The directory did not exist and has been created. Nothing to combine yet.
    CreatedInputDir(PathBuf),
    /// The directory exists but holds no `.csv` files.
    NoInputFiles,
    /// CSV files to combine, sorted by file name.
    Files(Vec<PathBuf>),
}

/// Lists the `.csv` files (case-insensitive extension) directly inside `dir`.
///
/// - A missing `dir` is created (with parents) and reported as [`ScanOutcome::CreatedInputDir`].
/// - Subdirectories are skipped, including ones whose name ends with `.csv`.
/// - Files are sorted by file name so repeated runs see the same order.
pub fn scan_input_dir(dir: impl AsRef<Path>) -> CombineResult<ScanOutcome> {
    let dir = dir.as_ref();

    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|source| CombineError::CreateInputDir {
            path: dir.to_path_buf(),
            source,
        })?;
        info!(path = %dir.display(), "created missing input folder");
        return Ok(ScanOutcome::CreatedInputDir(dir.to_path_buf()));
    }

    let files = list_csv_files(dir)?;
    if files.is_empty() {
        return Ok(ScanOutcome::NoInputFiles);
    }
    Ok(ScanOutcome::Files(files))
}

/// Lists `.csv` files in an existing directory without creating it.
pub fn list_csv_files(dir: &Path) -> CombineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CombineError::ReadDir {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let read_err = |source| CombineError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.file_name().is_some_and(has_csv_suffix) {
            continue;
        }
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), count = files.len(), "scanned input folder");
    Ok(files)
}

/// `true` when `name` ends in `.csv`, ignoring ASCII case. Works on raw bytes so names that are
/// not valid UTF-8 still match.
fn has_csv_suffix(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".csv")
}
