use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for combine operations.
pub type CombineResult<T> = Result<T, CombineError>;

/// Error type returned by the scanner, parser, writer and pipeline driver.
///
/// This is a single error enum shared by every stage. Rows that fail validation are never
/// errors; they are filtered out (see [`crate::processing::validate`]).
#[derive(Debug, Error)]
pub enum CombineError {
    /// Underlying I/O error without more specific context.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input directory was missing and could not be created.
    #[error("failed to create input folder {}: {source}", path.display())]
    CreateInputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory could not be listed.
    #[error("failed to list folder {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The combined output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tokenizer or writer error from the RFC 4180 dialect.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The run report could not be serialized.
    #[error("failed to serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CombineError {
    /// Returns the file system path this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::CreateInputDir { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadFile { path, .. }
            | Self::WriteOutput { path, .. } => Some(path),
            _ => None,
        }
    }
}
