use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::filter::{drop_incomplete, CoercedRow};
use super::model::{LoadedSignal, SignalTable};
use super::numeric::{is_numeric, parse_numeric};
use crate::analysis::rate::estimate_sampling_rate;
use crate::error::IngestError;

// ---------------------------------------------------------------------------
// Ingestion options
// ---------------------------------------------------------------------------

/// How a delimited text file is split and which lines are not data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Field separator. `.tsv` files always use a tab.
    pub delimiter: char,
    /// Lines starting with this are skipped everywhere, data region included.
    pub comment: char,
    /// Leading characters that mark a metadata line during header search.
    pub metadata_markers: String,
    /// Treat lines starting with whitespace as metadata during header search.
    pub skip_whitespace_led: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment: '%',
            metadata_markers: "%#;[".to_string(),
            skip_whitespace_led: true,
        }
    }
}

impl IngestOptions {
    /// Options adjusted for a concrete file: dispatch the delimiter by extension.
    pub fn resolved_for(&self, path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let mut resolved = self.clone();
        if ext == "tsv" {
            resolved.delimiter = '\t';
        }
        resolved
    }

    /// Whether a raw line looks like the start of the data region.
    pub fn is_data_line(&self, line: &str) -> bool {
        if line.starts_with(|c: char| self.metadata_markers.contains(c)) {
            return false;
        }
        if self.skip_whitespace_led && line.starts_with(char::is_whitespace) {
            return false;
        }
        let first = line.trim().split(self.delimiter).next().unwrap_or("");
        is_numeric(first)
    }

    fn delimiter_byte(&self) -> Result<u8, IngestError> {
        ascii_byte("delimiter", self.delimiter)
    }

    fn comment_byte(&self) -> Result<u8, IngestError> {
        ascii_byte("comment marker", self.comment)
    }
}

fn ascii_byte(what: &'static str, value: char) -> Result<u8, IngestError> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(IngestError::InvalidOption { what, value })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a time-series table with default options.
///
/// See [`load_file_with`].
pub fn load_file(path: &Path) -> Result<LoadedSignal, IngestError> {
    load_file_with(path, &IngestOptions::default())
}

/// Load a time-series table from a delimited text file.
///
/// Two sequential passes over the file:
/// 1. line scan: the header is the line right before the first data line
///    (row 0 when no data line exists),
/// 2. table parse from the header on, with comment lines skipped, malformed
///    rows dropped and cells coerced to numbers.
///
/// Rows with any non-numeric cell are discarded. Fewer than two surviving
/// rows is an error. The sampling rate comes from the first two timestamps.
pub fn load_file_with(path: &Path, options: &IngestOptions) -> Result<LoadedSignal, IngestError> {
    let options = options.resolved_for(path);

    let header_line = find_header_line(path, &options)?;
    log::debug!("{}: header detected on line {header_line}", path.display());

    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let (names, rows) = parse_table(skip_lines(&text, header_line), &options)?;

    let table = SignalTable::from_rows(names, &rows);
    if table.len() < 2 {
        return Err(IngestError::NoUsableRows { rows: table.len() });
    }

    let sampling_rate = estimate_sampling_rate(table.time());
    if sampling_rate == 0.0 {
        log::warn!(
            "{}: first two timestamps are equal, sampling rate undefined",
            path.display()
        );
    }

    let loaded = LoadedSignal {
        table,
        sampling_rate,
        header_line,
    };
    log::info!("Loaded {}: {loaded}", path.display());
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Pass 1: header detection
// ---------------------------------------------------------------------------

/// Index of the header line: the line just before the first data line.
///
/// Falls back to line 0 when no data line is found. Only an empty file is
/// an error.
pub fn find_header_line(path: &Path, options: &IngestOptions) -> Result<usize, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut saw_line = false;

    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| IngestError::io(path, e))?;
        saw_line = true;
        if options.is_data_line(&line) {
            return Ok(i.saturating_sub(1));
        }
    }

    if saw_line {
        Ok(0)
    } else {
        Err(IngestError::NoHeader(path.to_path_buf()))
    }
}

/// Drop the first `n` raw lines of `text`.
fn skip_lines(text: &str, n: usize) -> &str {
    let offset: usize = text.split_inclusive('\n').take(n).map(str::len).sum();
    &text[offset..]
}

// ---------------------------------------------------------------------------
// Pass 2: table parse and cleansing
// ---------------------------------------------------------------------------

/// Parse header names and complete numeric rows from the text starting at
/// the header line.
fn parse_table(
    body: &str,
    options: &IngestOptions,
) -> Result<(Vec<String>, Vec<Vec<f64>>), IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .comment(Some(options.comment_byte()?))
        .trim(csv::Trim::All)
        .has_headers(true)
        .from_reader(body.as_bytes());

    let names: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut malformed = 0usize;
    let mut coerced: Vec<CoercedRow> = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => coerced.push(record.iter().map(parse_numeric).collect()),
            Err(e) => {
                log::trace!("skipping malformed row: {e}");
                malformed += 1;
            }
        }
    }

    let parsed = coerced.len();
    let rows = drop_incomplete(coerced, names.len());
    log::debug!(
        "{} column(s), {parsed} row(s) parsed, {malformed} malformed, {} with missing cells",
        names.len(),
        parsed - rows.len()
    );

    Ok((names, rows))
}
