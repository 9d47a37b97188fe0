//! `csv-combine` merges a folder of per-entity CSV files into one CSV.
//!
//! The primary entrypoint is [`combine::combine_directory`], which runs the whole pipeline with
//! the paths and dialect from [`combine::CombineOptions`].
//!
//! ## Pipeline
//!
//! 1. [`ingestion::scan`]: list the `.csv` files in the input folder (extension matched
//!    case-insensitively). A missing folder is created and the run ends without output.
//! 2. [`ingestion::csv`]: read each file's header line and data lines into [`types::Row`]s keyed by
//!    that file's column names, and fold every file's columns into one [`types::HeaderSet`] in
//!    first-seen order.
//! 3. [`processing`]: drop any row holding an empty or `null` (any case) value.
//! 4. [`output`]: write the unified header, then every accepted row laid out in header order.
//!    Columns a row's file never had are written empty.
//!
//! ## Limitations
//!
//! By default lines are split on every `,` with no quoting support, so a value containing a comma
//! misaligns its row. Use [`ingestion::Dialect::Rfc4180`] for quoted fields on a single line.
//! Fields beyond a file's header count are dropped.
//!
//! ## Example
//!
//! ```rust
//! use csv_combine::combine::{combine_directory, CombineOptions, CombineOutcome};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tmp = tempfile::tempdir()?;
//! let input = tmp.path().join("companies");
//! std::fs::create_dir(&input)?;
//! std::fs::write(input.join("f1.csv"), "Name,City\nAcme,NY\nBeta,\n")?;
//! std::fs::write(input.join("f2.csv"), "Name,Revenue\nAcme,100\nGamma,null\n")?;
//!
//! let opts = CombineOptions {
//!     input_dir: input,
//!     output_path: tmp.path().join("combined.csv"),
//!     ..Default::default()
//! };
//! let CombineOutcome::Written(report) = combine_directory(&opts)? else {
//!     panic!("expected output");
//! };
//! assert_eq!(report.rows_accepted, 2);
//! assert_eq!(
//!     std::fs::read_to_string(&opts.output_path)?,
//!     "Name,City,Revenue\nAcme,NY,\nAcme,,100\n"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`combine`]: options, outcome and the pipeline driver
//! - [`ingestion`]: scanning, parsing and observer hooks
//! - [`processing`]: row validation
//! - [`output`]: combined CSV writer
//! - [`types`]: header set, row and batch types
//! - [`error`]: error type shared by every stage
//! - [`logging`]: subscriber setup for the binary

pub mod combine;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod output;
pub mod processing;
pub mod types;

pub use error::{CombineError, CombineResult};
