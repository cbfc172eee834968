//! End-to-end pipeline: workbooks to relative-change figures.
//!
//! Every entry point loads the segment's workbooks fresh; nothing is cached
//! or shared between calls, so concurrent requests never observe each
//! other's tables.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use thiserror::Error;

use ecldash_data::{load_segment_quarters, DataError, SegmentConfig};
use ecldash_output::{quarter_change_figures, ChartError, Figure};
use ecldash_transform::{
    combine_quarters, filter_selection, pivot_by_quarter, relative_changes, DashboardView,
    ReportingQuarter, Selection, TransformError,
};

/// Errors from running the full pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Ingestion failure
    #[error(transparent)]
    Data(#[from] DataError),

    /// Reshape or differencing failure
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Figure construction failure
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Figure payloads for one dashboard view.
#[derive(Debug, Clone)]
pub struct ViewFigures {
    /// The view these figures belong to.
    pub view: DashboardView,

    /// One figure per quarter pair.
    pub figures: Vec<Figure>,
}

/// Compute the relative-change table for one view over already-loaded
/// tidy tables.
pub fn changes_from_tables(
    tables: &BTreeMap<ReportingQuarter, DataFrame>,
    quarters: &[ReportingQuarter],
    selection: &Selection,
    view: DashboardView,
) -> Result<DataFrame, PipelineError> {
    let long = combine_quarters(tables, quarters, &view.slice())?;
    let pivoted = pivot_by_quarter(&long)?;
    let filtered = filter_selection(&pivoted, selection)?;
    Ok(relative_changes(&filtered, quarters)?)
}

/// Load a segment's workbooks and compute one view's relative-change table.
pub fn segment_changes(
    segment: &SegmentConfig,
    quarters: &[ReportingQuarter],
    selection: &Selection,
    view: DashboardView,
) -> Result<DataFrame, PipelineError> {
    let tables = load_segment_quarters(segment, quarters)?;
    changes_from_tables(&tables, quarters, selection, view)
}

/// Load a segment's workbooks once and build figure payloads for each
/// requested view.
pub fn dashboard_figures(
    segment: &SegmentConfig,
    quarters: &[ReportingQuarter],
    selection: &Selection,
    views: &[DashboardView],
) -> Result<Vec<ViewFigures>, PipelineError> {
    let tables = load_segment_quarters(segment, quarters)?;

    let mut results = Vec::with_capacity(views.len());
    for view in views {
        let changes = changes_from_tables(&tables, quarters, selection, *view)?;
        let figures = quarter_change_figures(&changes, view.label())?;
        tracing::debug!(view = view.slug(), figures = figures.len(), "built view figures");
        results.push(ViewFigures {
            view: *view,
            figures,
        });
    }
    Ok(results)
}
