//! Row validation for [`crate::types::Row`].
//!
//! A row is valid when every value it holds is non-empty after trimming (see
//! [`crate::ingestion::csv::trim_cell`]) and is not the text `null` in any letter case. One bad
//! cell rejects the whole row. Columns the row does not hold are never checked.

use std::fmt;

use crate::ingestion::csv::trim_cell;
use crate::types::{Row, RowBatch};

/// Why a cell failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The value was empty or whitespace only.
    Empty,
    /// The value was the literal `null` (case-insensitive).
    NullLiteral,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::NullLiteral => f.write_str("null"),
        }
    }
}

/// The first failing cell of a rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Column holding the failing value.
    pub column: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column '{}' is {}", self.column, self.reason)
    }
}

/// Returns `true` if `value` counts as a missing cell.
pub fn is_null_like(value: &str) -> bool {
    cell_problem(value).is_some()
}

fn cell_problem(value: &str) -> Option<RejectReason> {
    let trimmed = trim_cell(value);
    if trimmed.is_empty() {
        Some(RejectReason::Empty)
    } else if trimmed.eq_ignore_ascii_case("null") {
        Some(RejectReason::NullLiteral)
    } else {
        None
    }
}

/// Check `row`, reporting the first failing cell in column order.
pub fn check_row(row: &Row) -> Result<(), Rejection> {
    for (column, value) in row.iter() {
        if let Some(reason) = cell_problem(value) {
            return Err(Rejection {
                column: column.to_owned(),
                reason,
            });
        }
    }
    Ok(())
}

/// Returns `true` if every cell of `row` is present and non-null.
pub fn is_row_valid(row: &Row) -> bool {
    check_row(row).is_ok()
}

/// Returns a new [`RowBatch`] containing only valid rows.
///
/// This is a convenience wrapper around [`RowBatch::filter`].
pub fn filter_valid(batch: &RowBatch) -> RowBatch {
    batch.filter(is_row_valid)
}
