use std::path::PathBuf;

use derive_more::Display;
use thiserror::Error;

/// A numeric column of a trading day.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    #[display(fmt = "open")]
    Open,
    #[display(fmt = "high")]
    High,
    #[display(fmt = "low")]
    Low,
    #[display(fmt = "close")]
    Close,
    #[display(fmt = "volume")]
    Volume,
}

impl Field {
    fn kind(&self) -> &'static str {
        match self {
            Field::Volume => "non-negative integer",
            _ => "float",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("wrong field count: expected {expected}, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("expected `code:KEY:value`, found {0:?}")]
    TokenCount(String),

    #[error("'{field}' is not a {}: {value:?}", field.kind())]
    InvalidField { field: Field, value: String },
}

/// A [`FormatError`] tagged with the 1-based line it occurred on.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {reason}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub reason: FormatError,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {}: {source}", path.display())]
    DataFormat {
        path: PathBuf,
        #[source]
        source: LineError,
    },

    #[error("unknown data file format: {}", .0.display())]
    UnknownFormat(PathBuf),
}

impl LoadError {
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            LoadError::DataFormat { source, .. } => Some(&source.reason),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("invalid {field} on {date}, unable to process")]
    InvalidData { field: Field, date: String },

    #[error("no trading days were processed")]
    NoData,

    #[error("moving average window must be at least one day")]
    ZeroWindow,
}
