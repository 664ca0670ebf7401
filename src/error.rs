//! Error types
//!
//! Every failure the library can report is one of these:
//!
//! - [`ParseError`] - a line does not have the `<date> <time> - <LEVEL> - <message>. (<n>)` shape
//! - [`LineError`] - a [`ParseError`] tagged with the 1-based line number it came from
//! - [`UnknownLevel`] - a level token outside the closed set of severities
//! - [`StoreError`] - the database could not be opened, written or read
//! - [`ReportError`] - charts could not be built or written
//!
//! Command glue in `main` wraps these in `anyhow::Error` with context.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single log line could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 3 segments separated by \" - \", found {found}")]
    MissingSegment { found: usize },

    #[error("unsupported line: {found} segments separated by \" - \", expected exactly 3")]
    ExtraSegments { found: usize },

    #[error("message `{segment}` has no \". \" before the trailing number")]
    MissingNumber { segment: String },

    #[error("timestamp `{segment}` has no space between date and time")]
    MissingTime { segment: String },

    #[error("`{token}` is not an integer")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub source: ParseError,
}

/// A level token with no entry in the color table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown log level `{0}`")]
pub struct UnknownLevel(pub String);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to prepare the logs table")]
    Schema(#[source] rusqlite::Error),

    #[error("batch insert failed")]
    Insert(#[source] rusqlite::Error),

    #[error("failed to query logs")]
    Query(#[source] rusqlite::Error),

    #[error("failed to close database")]
    Close(#[source] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    UnknownLevel(#[from] UnknownLevel),

    #[error("`{value}` is not a valid date and time")]
    InvalidTimestamp { value: String },

    #[error("failed to write chart to {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("terminal error")]
    Terminal(#[from] std::io::Error),
}
