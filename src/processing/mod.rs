//! Row validation.
//!
//! Parsed rows are filtered with a strict all-or-nothing predicate before they reach the writer.
//!
//! ```rust
//! use csv_combine::processing::{check_row, is_row_valid, RejectReason};
//! use csv_combine::types::Row;
//!
//! let ok: Row = [("Name", "Acme"), ("City", "NY")].into_iter().collect();
//! assert!(is_row_valid(&ok));
//!
//! let bad: Row = [("Name", "Gamma"), ("Revenue", "NULL")].into_iter().collect();
//! let rejection = check_row(&bad).unwrap_err();
//! assert_eq!(rejection.column, "Revenue");
//! assert_eq!(rejection.reason, RejectReason::NullLiteral);
//! ```

pub mod validate;

pub use validate::{RejectReason, Rejection, check_row, filter_valid, is_null_like, is_row_valid};
