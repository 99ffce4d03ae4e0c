//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Why a data row was dropped during normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row carries the `Present (Music` corruption signature.
    #[error("row contains the corruption marker {0:?}")]
    CorruptionMarker(&'static str),

    /// The name column is missing or blank.
    #[error("row has no name")]
    BlankName,
}

/// A field that could not be coerced and was replaced by its default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldFallback {
    #[error("{0:?} is not a number, using 0")]
    NotANumber(String),

    #[error("{0:?} has no recognisable year, using 2000")]
    NoYear(String),

    #[error("year {0} is before 1900, using 2000")]
    YearOutOfRange(i32),
}

/// A load attempt that could not install a new dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Both the primary and the fallback source failed.
    #[error("could not load data from {primary} ({primary_error:#}) or {fallback} ({fallback_error:#})")]
    AllSourcesFailed {
        primary: String,
        primary_error: anyhow::Error,
        fallback: String,
        fallback_error: anyhow::Error,
    },
}
