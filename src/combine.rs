//! Pipeline entrypoint.
//!
//! Most callers should use [`combine_directory`], which:
//!
//! - scans [`CombineOptions::input_dir`] for `.csv` files (creating it on first run)
//! - parses every file and unifies their headers
//! - drops rows with an empty or `null` cell
//! - writes the combined CSV to [`CombineOptions::output_path`]
//!
//! Nothing is written until every input file has been read, so a read failure leaves any
//! existing output untouched.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span};

use crate::error::{CombineError, CombineResult};
use crate::ingestion::{
    CombineObserver, Dialect, FileContext, FileStats, ScanOutcome, parse_all, scan_input_dir,
};
use crate::output::write_combined_to_path;
use crate::processing::check_row;
use crate::types::{HeaderSet, RowBatch, SourceFile};

/// Conventional input folder.
pub const DEFAULT_INPUT_DIR: &str = "data/companies";
/// Conventional output file.
pub const DEFAULT_OUTPUT_PATH: &str = "data/combined_companies.csv";

/// Options controlling a combine run.
///
/// Use [`Default`] for the conventional paths.
#[derive(Clone)]
pub struct CombineOptions {
    /// Folder holding the per-entity CSV files.
    pub input_dir: PathBuf,
    /// Combined CSV destination.
    pub output_path: PathBuf,
    /// Line splitting / output quoting dialect.
    pub dialect: Dialect,
    /// Optional observer for per-file stats and rejected rows.
    pub observer: Option<Arc<dyn CombineObserver>>,
}

impl fmt::Debug for CombineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombineOptions")
            .field("input_dir", &self.input_dir)
            .field("output_path", &self.output_path)
            .field("dialect", &self.dialect)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            dialect: Dialect::default(),
            observer: None,
        }
    }
}

/// How a run ended. Every variant is a successful termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineOutcome {
    /// The input folder was missing and has been created; no output written.
    CreatedInputDir(PathBuf),
    /// The input folder has no `.csv` files; no output written.
    NoInputFiles(PathBuf),
    /// The combined file was written.
    Written(CombineReport),
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineReport {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    /// Files found by the scan.
    pub files_scanned: usize,
    /// Files skipped because they had no lines.
    pub files_skipped: usize,
    /// Unified header, in output order.
    pub headers: Vec<String>,
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
}

impl CombineReport {
    /// Serialize the report as pretty JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> CombineResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| CombineError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Run the whole pipeline described by `options`.
///
/// When an observer is configured, `on_failure` is called before an error is returned.
///
/// ```no_run
/// use csv_combine::combine::{combine_directory, CombineOptions, CombineOutcome};
///
/// # fn main() -> Result<(), csv_combine::CombineError> {
/// match combine_directory(&CombineOptions::default())? {
///     CombineOutcome::Written(report) => println!("rows={}", report.rows_accepted),
///     other => println!("nothing written: {other:?}"),
/// }
/// # Ok(())
/// # }
/// ```
pub fn combine_directory(options: &CombineOptions) -> CombineResult<CombineOutcome> {
    let _span = info_span!("combine", input = %options.input_dir.display()).entered();

    let result = run(options);
    if let (Err(e), Some(obs)) = (&result, options.observer.as_ref()) {
        obs.on_failure(e);
    }
    result
}

fn run(options: &CombineOptions) -> CombineResult<CombineOutcome> {
    let files = match scan_input_dir(&options.input_dir)? {
        ScanOutcome::CreatedInputDir(dir) => return Ok(CombineOutcome::CreatedInputDir(dir)),
        ScanOutcome::NoInputFiles => {
            return Ok(CombineOutcome::NoInputFiles(options.input_dir.clone()));
        }
        ScanOutcome::Files(files) => files,
    };
    info!(files = files.len(), "found input files");

    let splitter = options.dialect.splitter();
    let (headers, sources) = parse_all(&files, &*splitter)?;
    let (batch, totals) = accept_rows(&sources, options.observer.as_deref());

    write_combined_to_path(&options.output_path, &headers, &batch, options.dialect)?;
    info!(
        path = %options.output_path.display(),
        rows = batch.len(),
        columns = headers.len(),
        "combined csv written"
    );

    Ok(CombineOutcome::Written(CombineReport {
        input_dir: options.input_dir.clone(),
        output_path: options.output_path.clone(),
        files_scanned: files.len(),
        files_skipped: files.len() - sources.len(),
        headers: headers.as_slice().to_vec(),
        rows_read: totals.rows_read,
        rows_accepted: totals.rows_accepted,
        rows_rejected: totals.rows_rejected,
    }))
}

/// Validate the rows of every source, in order, collecting the accepted ones.
///
/// Rejections go to `observer` when one is set; otherwise they are dropped silently.
pub fn accept_rows(
    sources: &[SourceFile],
    observer: Option<&dyn CombineObserver>,
) -> (RowBatch, FileStats) {
    let mut batch = RowBatch::new();
    let mut totals = FileStats {
        rows_read: 0,
        rows_accepted: 0,
        rows_rejected: 0,
    };

    for source in sources {
        let ctx = FileContext {
            path: source.path.clone(),
        };
        let mut stats = FileStats {
            rows_read: source.row_count(),
            rows_accepted: 0,
            rows_rejected: 0,
        };

        for (line, row) in &source.rows {
            match check_row(row) {
                Ok(()) => {
                    batch.push(row.clone());
                    stats.rows_accepted += 1;
                }
                Err(rejection) => {
                    stats.rows_rejected += 1;
                    if let Some(obs) = observer {
                        obs.on_row_rejected(&ctx, *line, &rejection);
                    }
                }
            }
        }

        if let Some(obs) = observer {
            obs.on_file_done(&ctx, stats);
        }
        totals.rows_read += stats.rows_read;
        totals.rows_accepted += stats.rows_accepted;
        totals.rows_rejected += stats.rows_rejected;
    }

    (batch, totals)
}

/// Combine an explicit list of files in memory, without scanning or writing.
pub fn combine_files<P: AsRef<Path>>(
    paths: &[P],
    dialect: Dialect,
) -> CombineResult<(HeaderSet, RowBatch)> {
    let splitter = dialect.splitter();
    let (headers, sources) = parse_all(paths, &*splitter)?;
    let (batch, _) = accept_rows(&sources, None);
    Ok((headers, batch))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::accept_rows;
    use crate::types::{Row, SourceFile};

    fn source(name: &str, rows: Vec<Vec<(&str, &str)>>) -> SourceFile {
        SourceFile {
            path: PathBuf::from(name),
            headers: Vec::new(),
            rows: rows
                .into_iter()
                .enumerate()
                .map(|(i, cells)| (i + 2, cells.into_iter().collect::<Row>()))
                .collect(),
        }
    }

    #[test]
    fn accept_rows_counts_per_file_totals() {
        let sources = vec![
            source("a.csv", vec![vec![("A", "1")], vec![("A", "")]]),
            source("b.csv", vec![vec![("B", "null")], vec![("B", "2")], vec![("B", "3")]]),
        ];

        let (batch, totals) = accept_rows(&sources, None);
        assert_eq!(batch.len(), 3);
        assert_eq!(totals.rows_read, 5);
        assert_eq!(totals.rows_accepted, 3);
        assert_eq!(totals.rows_rejected, 2);
    }
}
