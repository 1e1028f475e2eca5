use std::path::PathBuf;

use thiserror::Error;

/// Structural ingestion failures.
///
/// Row-level problems never show up here: bad rows are dropped during
/// cleansing and only the aggregate outcome (`NoUsableRows`) is reported.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no header found in {}: file has no lines", .0.display())]
    NoHeader(PathBuf),

    #[error("parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("no usable rows: {rows} complete row(s) survived cleansing, need at least 2")]
    NoUsableRows { rows: usize },

    #[error("{what} must be a single ASCII character, got {value:?}")]
    InvalidOption { what: &'static str, value: char },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}
