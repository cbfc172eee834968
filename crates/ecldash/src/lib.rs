#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use ecldash_data as data;
pub use ecldash_output as output;
pub use ecldash_transform as transform;

pub use pipeline::{dashboard_figures, segment_changes, PipelineError, ViewFigures};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
