//! Slicing one (category, sub-metric) view out of a tidy disclosure table.
//!
//! A preprocessed table is tidy: one row per (firm, category, portfolio,
//! metric) cell. The dashboard only ever looks at one category and one
//! sub-metric at a time (e.g. the "Total" metric of "ECL"), keeping the
//! portfolio breakdown as the columns of the eventual chart.

use polars::prelude::*;

use crate::category::Category;
use crate::error::{Result, TransformError};

/// A (category, sub-metric) selection over a tidy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSlice {
    /// Category to select
    pub category: Category,
    /// Sub-metric label within the category, e.g. `"Total"` or `"S2"`
    pub metric: String,
}

impl MetricSlice {
    /// Create a slice selection.
    pub fn new(category: Category, metric: impl Into<String>) -> Self {
        Self {
            category,
            metric: metric.into(),
        }
    }
}

/// The standard dashboard views, each a fixed [`MetricSlice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardView {
    /// Total ECL per portfolio
    Ecl,
    /// Stage 2 balance share per portfolio
    Stage2Share,
    /// Stage 3 balance share per portfolio
    Stage3Share,
    /// Total coverage ratio per portfolio
    Coverage,
}

impl DashboardView {
    /// All views, in display order.
    pub const ALL: [Self; 4] = [Self::Ecl, Self::Stage2Share, Self::Stage3Share, Self::Coverage];

    /// Views rendered on the web dashboard (Coverage is export-only).
    pub const WEB: [Self; 3] = [Self::Ecl, Self::Stage2Share, Self::Stage3Share];

    /// Human-readable view label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ecl => "ECL",
            Self::Stage2Share => "Stage 2 Balance",
            Self::Stage3Share => "Stage 3 Balance",
            Self::Coverage => "Coverage",
        }
    }

    /// Identifier used in URLs and CLI flags.
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Ecl => "ecl",
            Self::Stage2Share => "stage2",
            Self::Stage3Share => "stage3",
            Self::Coverage => "coverage",
        }
    }

    /// The (category, sub-metric) pair this view selects.
    pub fn slice(&self) -> MetricSlice {
        match self {
            Self::Ecl => MetricSlice::new(Category::Ecl, "Total"),
            Self::Stage2Share => MetricSlice::new(Category::StagingBalances, "S2"),
            Self::Stage3Share => MetricSlice::new(Category::StagingBalances, "S3"),
            Self::Coverage => MetricSlice::new(Category::Coverage, "Total"),
        }
    }

    /// Look a view up by its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.slug() == slug)
    }
}

/// Select the rows of `tidy` matching the slice, keeping firm, portfolio
/// and value.
///
/// Errors with [`TransformError::CategoryMissing`] when the category does
/// not appear in the table at all; an unknown sub-metric merely yields an
/// empty result.
pub fn slice_metric(tidy: &DataFrame, slice: &MetricSlice) -> Result<DataFrame> {
    let category = slice.category.as_str();
    let present = tidy
        .column("category")?
        .str()?
        .into_iter()
        .flatten()
        .any(|c| c == category);
    if !present {
        return Err(TransformError::CategoryMissing(category.to_string()));
    }

    let out = tidy
        .clone()
        .lazy()
        .filter(
            col("category")
                .eq(lit(category))
                .and(col("metric").eq(lit(slice.metric.as_str()))),
        )
        .select([col("firm"), col("portfolio"), col("value")])
        .collect()?;

    Ok(out)
}
