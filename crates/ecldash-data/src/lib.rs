//! Workbook ingestion and preprocessing for ecldash.
//!
//! Reads the fixed-layout disclosure workbooks (one per segment and
//! reporting quarter), normalizes each into a tidy polars table keyed by
//! (firm, category, portfolio, metric), and loads the segment configuration
//! that names the available segments, firms and quarters.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod preprocess;
pub mod workbook;

pub use config::{AppConfig, SegmentConfig};
pub use error::{DataError, Result};
pub use preprocess::preprocess;
pub use workbook::{load_raw_sheet, load_segment_quarters, RawCell, RawSheet};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
