//! Combined CSV writer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{CombineError, CombineResult};
use crate::ingestion::Dialect;
use crate::types::{HeaderSet, Row, RowBatch};

/// Values of `row` laid out in `headers` order.
///
/// A column the row does not hold, or a value equal to `null` in any case, renders as `""`.
pub fn render_row<'a>(headers: &HeaderSet, row: &'a Row) -> Vec<&'a str> {
    headers
        .names()
        .map(|h| match row.get(h) {
            Some(v) if !v.eq_ignore_ascii_case("null") => v,
            _ => "",
        })
        .collect()
}

/// Write the header line and every row of `rows` to `writer`.
///
/// Lines end with `\n`. With [`Dialect::Literal`] values are joined with `,` as-is; with
/// [`Dialect::Rfc4180`] fields are quoted where needed.
pub fn write_combined<W: Write>(
    writer: W,
    headers: &HeaderSet,
    rows: &RowBatch,
    dialect: Dialect,
) -> CombineResult<()> {
    write_lines(writer, headers, rows, dialect)?;
    Ok(())
}

/// Create (or truncate) `path` and write the combined CSV to it.
///
/// The parent directory is created if missing. Any failure is reported as
/// [`CombineError::WriteOutput`].
pub fn write_combined_to_path(
    path: impl AsRef<Path>,
    headers: &HeaderSet,
    rows: &RowBatch,
    dialect: Dialect,
) -> CombineResult<()> {
    let path = path.as_ref();
    let wrap = |source| CombineError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    let file = File::create(path).map_err(wrap)?;
    write_lines(BufWriter::new(file), headers, rows, dialect).map_err(wrap)?;

    debug!(path = %path.display(), rows = rows.len(), "wrote combined csv");
    Ok(())
}

fn write_lines<W: Write>(
    writer: W,
    headers: &HeaderSet,
    rows: &RowBatch,
    dialect: Dialect,
) -> io::Result<()> {
    match dialect {
        Dialect::Literal => {
            let mut w = writer;
            writeln!(w, "{}", headers.as_slice().join(","))?;
            for row in rows {
                writeln!(w, "{}", render_row(headers, row).join(","))?;
            }
            w.flush()
        }
        Dialect::Rfc4180 => {
            let mut w = csv::WriterBuilder::new()
                .terminator(csv::Terminator::Any(b'\n'))
                .quote_style(csv::QuoteStyle::Necessary)
                .from_writer(writer);
            w.write_record(headers.names())?;
            for row in rows {
                w.write_record(render_row(headers, row))?;
            }
            w.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{render_row, write_combined};
    use crate::ingestion::Dialect;
    use crate::types::{HeaderSet, Row, RowBatch};

    fn headers(names: &[&str]) -> HeaderSet {
        names.iter().copied().collect()
    }

    fn row(cells: &[(&str, &str)]) -> Row {
        cells.iter().copied().collect()
    }

    #[test]
    fn render_row_fills_missing_columns() {
        let h = headers(&["Name", "City", "Revenue"]);
        let r = row(&[("Revenue", "100"), ("Name", "Acme")]);
        assert_eq!(render_row(&h, &r), vec!["Acme", "", "100"]);
    }

    #[test]
    fn render_row_blanks_null_literal() {
        let h = headers(&["A", "B"]);
        let r = row(&[("A", "NuLL"), ("B", "x")]);
        assert_eq!(render_row(&h, &r), vec!["", "x"]);
    }

    #[test]
    fn literal_output_has_one_line_per_row() {
        let h = headers(&["Name", "City", "Revenue"]);
        let rows: RowBatch = vec![
            row(&[("Name", "Acme"), ("City", "NY")]),
            row(&[("Name", "Acme"), ("Revenue", "100")]),
        ]
        .into_iter()
        .collect();

        let mut out = Vec::new();
        write_combined(&mut out, &h, &rows, Dialect::Literal).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name,City,Revenue\nAcme,NY,\nAcme,,100\n"
        );
    }

    #[test]
    fn literal_output_with_no_rows_is_header_only() {
        let mut out = Vec::new();
        let empty = RowBatch::new();
        write_combined(&mut out, &headers(&["A", "B"]), &empty, Dialect::Literal).unwrap();
        assert_eq!(out, b"A,B\n");
    }

    #[test]
    fn rfc4180_output_quotes_embedded_commas() {
        let h = headers(&["Name", "City"]);
        let rows: RowBatch = vec![row(&[("Name", "Acme, Inc"), ("City", "NY")])]
            .into_iter()
            .collect();

        let mut out = Vec::new();
        write_combined(&mut out, &h, &rows, Dialect::Rfc4180).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name,City\n\"Acme, Inc\",NY\n"
        );
    }
}
