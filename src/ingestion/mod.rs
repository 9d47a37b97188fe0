//! Input side of the pipeline: directory scanning and CSV parsing.
//!
//! - [`scan`]: find the `.csv` files to combine (creating the input folder on first run)
//! - [`csv`]: split lines, build header-keyed rows, unify headers across files
//! - [`observability`]: observer hooks for per-file stats and rejected rows

pub mod csv;
pub mod observability;
pub mod scan;

pub use self::csv::{
    Dialect, LineSplitter, LiteralSplitter, Rfc4180Splitter, parse_all, parse_csv_from_path,
};
pub use observability::{
    CombineObserver, CompositeObserver, FileContext, FileStats, RejectedRowsFile, TracingObserver,
};
pub use scan::{ScanOutcome, scan_input_dir};
