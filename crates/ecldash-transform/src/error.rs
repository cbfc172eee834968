//! Error types for table transformations.

use thiserror::Error;

/// Result type for table transformations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors that can occur while reshaping or differencing tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A reporting-quarter token could not be parsed
    #[error("invalid reporting quarter token: {0:?} (expected e.g. \"4Q20\")")]
    InvalidQuarterToken(String),

    /// The requested category does not exist in the table
    #[error("category {0:?} not present in table")]
    CategoryMissing(String),

    /// No table is available for a requested quarter
    #[error("no table loaded for quarter {0}")]
    QuarterMissing(String),

    /// A change computation was requested over fewer than two periods
    #[error("need at least two periods to compute change, got {found}")]
    InsufficientPeriods {
        /// Number of distinct periods that were supplied
        found: usize,
    },
}
