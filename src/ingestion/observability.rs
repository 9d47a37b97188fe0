use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::{CombineError, CombineResult};
use crate::processing::Rejection;

/// Context about the file currently being combined.
#[derive(Debug, Clone)]
pub struct FileContext {
    /// The input path.
    pub path: PathBuf,
}

/// Per-file stats reported once a file has been parsed and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// Number of data lines read.
    pub rows_read: usize,
    /// Rows that passed validation.
    pub rows_accepted: usize,
    /// Rows that were dropped.
    pub rows_rejected: usize,
}

/// Observer interface for combine progress.
///
/// All methods default to no-ops, so rows are dropped silently unless an observer asks for them.
pub trait CombineObserver: Send + Sync {
    /// Called after a file has been parsed and its rows validated.
    fn on_file_done(&self, _ctx: &FileContext, _stats: FileStats) {}

    /// Called for every row that fails validation. `line` is 1-based.
    fn on_row_rejected(&self, _ctx: &FileContext, _line: usize, _rejection: &Rejection) {}

    /// Called when the run aborts with an error.
    fn on_failure(&self, _error: &CombineError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn CombineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn CombineObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn CombineObserver>) {
        self.observers.push(observer);
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl CombineObserver for CompositeObserver {
    fn on_file_done(&self, ctx: &FileContext, stats: FileStats) {
        for o in &self.observers {
            o.on_file_done(ctx, stats);
        }
    }

    fn on_row_rejected(&self, ctx: &FileContext, line: usize, rejection: &Rejection) {
        for o in &self.observers {
            o.on_row_rejected(ctx, line, rejection);
        }
    }

    fn on_failure(&self, error: &CombineError) {
        for o in &self.observers {
            o.on_failure(error);
        }
    }
}

/// Logs combine events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl CombineObserver for TracingObserver {
    fn on_file_done(&self, ctx: &FileContext, stats: FileStats) {
        info!(
            path = %ctx.path.display(),
            rows_read = stats.rows_read,
            rows_accepted = stats.rows_accepted,
            rows_rejected = stats.rows_rejected,
            "file combined"
        );
    }

    fn on_row_rejected(&self, ctx: &FileContext, line: usize, rejection: &Rejection) {
        debug!(
            path = %ctx.path.display(),
            line,
            column = %rejection.column,
            reason = %rejection.reason,
            "row rejected"
        );
    }
}

/// Rejected-rows log: one `<path>:<line>: <column> <reason>` line per dropped row.
///
/// The file is opened (append mode) when the observer is created, so a bad log path fails the
/// run before any input is read. Lines are buffered and flushed after each input file.
#[derive(Debug)]
pub struct RejectedRowsFile {
    path: PathBuf,
    out: Mutex<BufWriter<File>>,
}

impl RejectedRowsFile {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: impl AsRef<Path>) -> CombineResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| CombineError::WriteOutput {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            out: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Location of the log.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CombineObserver for RejectedRowsFile {
    fn on_file_done(&self, _ctx: &FileContext, _stats: FileStats) {
        if let Ok(mut out) = self.out.lock() {
            if let Err(error) = out.flush() {
                warn!(path = %self.path.display(), %error, "failed to flush rejected-rows log");
            }
        }
    }

    fn on_row_rejected(&self, ctx: &FileContext, line: usize, rejection: &Rejection) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(error) = writeln!(
            out,
            "{}:{}: {} {}",
            ctx.path.display(),
            line,
            rejection.column,
            rejection.reason
        ) {
            warn!(path = %self.path.display(), %error, "failed to write rejected-rows log");
        }
    }
}
