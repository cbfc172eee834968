//! Error types for ingestion and preprocessing.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ingestion and preprocessing.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or normalizing disclosure workbooks.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet reader error
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Configuration file could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Transformation error (quarter tokens in configuration, etc.)
    #[error(transparent)]
    Transform(#[from] ecldash_transform::TransformError),

    /// A metric column sits outside the template's classification ranges.
    /// The raw layout changed; proceeding would misclassify data.
    #[error(
        "metric column at position {position} is outside the known template \
         ranges; the workbook layout has changed"
    )]
    UnclassifiedColumn {
        /// 1-based column position that failed classification
        position: usize,
    },

    /// The sheet does not have the expected overall shape
    #[error("unexpected workbook layout: {0}")]
    Layout(String),

    /// A workbook file is missing for a requested quarter
    #[error("no workbook for quarter {quarter} at {path}")]
    MissingWorkbook {
        /// Quarter label
        quarter: String,
        /// Path that was probed
        path: PathBuf,
    },

    /// The configuration does not define the requested segment
    #[error("unknown segment: {0}")]
    UnknownSegment(String),
}
