//! Reshape and quarter-over-quarter change engine for ecldash.
//!
//! This crate holds the only nontrivial computation in the dashboard: taking
//! tidy per-quarter disclosure tables, slicing out one (category, sub-metric)
//! view, combining quarters into a long-format table, pivoting by reporting
//! quarter and computing every pairwise relative change between quarters.
//!
//! All tables are polars [`DataFrame`](polars::prelude::DataFrame)s; missing
//! values are nulls throughout and the change math is total over them (a zero
//! or missing denominator yields null, never a panic).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod category;
pub mod combine;
pub mod error;
pub mod pivot;
pub mod quarter;
pub mod slice;

pub use category::{Category, CategoryRange, CATEGORY_RANGES, classify_position};
pub use combine::combine_quarters;
pub use error::{Result, TransformError};
pub use pivot::{filter_selection, pivot_by_quarter, relative_changes, Selection};
pub use quarter::ReportingQuarter;
pub use slice::{slice_metric, DashboardView, MetricSlice};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
