//! Header unification and row parsing.
//!
//! Each file's first line is its header line; every following line becomes one [`Row`] keyed by
//! that file's trimmed header names. Field splitting is delegated to a [`LineSplitter`]:
//!
//! - [`LiteralSplitter`] (the default) splits on every `,`. Quoting is not understood, so a value
//!   containing a comma shifts the remaining columns to the right.
//! - [`Rfc4180Splitter`] understands double-quoted fields on a single physical line.
//!
//! Rows are positional: a line with fewer fields than headers gets empty strings for the missing
//! trailing columns; fields beyond the header count are dropped.
//!
//! Lines end at `\n`, `\r\n` or a lone `\r`. Bytes that are not valid UTF-8 are replaced with
//! U+FFFD rather than failing the file.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info_span, trace, warn};

use crate::error::{CombineError, CombineResult};
use crate::types::{HeaderSet, Row, SourceFile};

/// Which line splitter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Split on every comma; no quoting.
    #[default]
    Literal,
    /// RFC 4180 quoting within a single line.
    Rfc4180,
}

impl Dialect {
    /// The splitter implementing this dialect.
    pub fn splitter(self) -> Box<dyn LineSplitter> {
        match self {
            Self::Literal => Box::new(LiteralSplitter),
            Self::Rfc4180 => Box::new(Rfc4180Splitter),
        }
    }
}

/// Splits one line (without its terminator) into raw, untrimmed fields.
pub trait LineSplitter {
    fn split(&self, line: &str) -> CombineResult<Vec<String>>;
}

/// Splits on every `,`. Empty input yields a single empty field.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralSplitter;

impl LineSplitter for LiteralSplitter {
    fn split(&self, line: &str) -> CombineResult<Vec<String>> {
        Ok(line.split(',').map(str::to_owned).collect())
    }
}

/// Splits using the `csv` crate's tokenizer, so `"a,b"` is one field.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rfc4180Splitter;

impl LineSplitter for Rfc4180Splitter {
    fn split(&self, line: &str) -> CombineResult<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());

        let mut record = csv::StringRecord::new();
        if !rdr.read_record(&mut record)? {
            // The tokenizer skips blank lines; keep the literal shape of one empty field.
            return Ok(vec![String::new()]);
        }
        Ok(record.iter().map(str::to_owned).collect())
    }
}

/// Parse one CSV file into its headers and candidate rows.
///
/// Returns `Ok(None)` for a file with no lines at all.
pub fn parse_csv_from_path(
    path: impl AsRef<Path>,
    splitter: &dyn LineSplitter,
) -> CombineResult<Option<SourceFile>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CombineError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv_from_reader(BufReader::new(file), path.to_path_buf(), splitter)
}

/// Parse CSV data from an existing reader. `path` is used for error context only.
pub fn parse_csv_from_reader<R: BufRead>(
    mut reader: R,
    path: PathBuf,
    splitter: &dyn LineSplitter,
) -> CombineResult<Option<SourceFile>> {
    let _span = info_span!("parse_file", path = %path.display()).entered();
    let read_err = |source| CombineError::ReadFile {
        path: path.clone(),
        source,
    };

    let mut buf = Vec::new();
    if !read_raw_line(&mut reader, &mut buf).map_err(read_err)? {
        debug!("empty file, skipping");
        return Ok(None);
    }

    let headers: Vec<String> = splitter
        .split(&decode_line(&buf, 1))?
        .iter()
        .map(|h| trim_cell(h).to_owned())
        .collect();

    let mut rows = Vec::new();
    // Header is line 1.
    let mut line_no = 1;
    while read_raw_line(&mut reader, &mut buf).map_err(read_err)? {
        line_no += 1;
        let fields = splitter.split(&decode_line(&buf, line_no))?;
        trace!(line = line_no, fields = fields.len(), "parsed line");
        rows.push((line_no, build_row(&headers, &fields)));
    }

    debug!(headers = headers.len(), rows = rows.len(), "parsed file");
    Ok(Some(SourceFile {
        path,
        headers,
        rows,
    }))
}

/// Read one line into `buf` without its terminator. Returns `false` at end of input.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final line without a terminator is still
/// returned; a terminator right before end of input does not start another line.
pub fn read_raw_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    let mut read_any = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let ended_on_cr = available[i] == b'\r';
                buf.extend_from_slice(&available[..i]);
                reader.consume(i + 1);
                if ended_on_cr && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            None => {
                let n = available.len();
                buf.extend_from_slice(available);
                reader.consume(n);
            }
        }
    }
}

fn decode_line(raw: &[u8], line_no: usize) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(raw);
    if let Cow::Owned(_) = text {
        warn!(line = line_no, "invalid UTF-8 replaced with U+FFFD");
    }
    text
}

/// Strip leading and trailing ASCII control characters and spaces (everything up to U+0020).
///
/// Other whitespace, such as a non-breaking space, is kept as cell content.
pub fn trim_cell(value: &str) -> &str {
    value.trim_matches(|c: char| c <= ' ')
}

/// Pair `headers` with `fields` by position, trimming values with [`trim_cell`].
pub fn build_row(headers: &[String], fields: &[String]) -> Row {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let value = fields.get(i).map(|f| trim_cell(f)).unwrap_or("");
            (h.as_str(), value)
        })
        .collect()
}

/// Fold the header lists of `sources` into one set, in file order then column order.
pub fn unify_headers<'a, I>(sources: I) -> HeaderSet
where
    I: IntoIterator<Item = &'a SourceFile>,
{
    let mut set = HeaderSet::new();
    for source in sources {
        set.extend(source.headers.iter().cloned());
    }
    set
}

/// Parse every file in `paths`, in order, skipping empty ones.
///
/// Returns the unified [`HeaderSet`] together with the parsed files. Each file is closed before
/// the next is opened. The first I/O error aborts the whole pass.
pub fn parse_all<P: AsRef<Path>>(
    paths: &[P],
    splitter: &dyn LineSplitter,
) -> CombineResult<(HeaderSet, Vec<SourceFile>)> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(source) = parse_csv_from_path(path, splitter)? {
            sources.push(source);
        }
    }
    let headers = unify_headers(&sources);
    Ok((headers, sources))
}
