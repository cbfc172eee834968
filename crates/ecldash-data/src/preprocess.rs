//! Normalization of one raw workbook grid into a tidy disclosure table.
//!
//! The raw grid has a sparse portfolio header (labels only at portfolio
//! boundaries), a sub-metric header, firm rows below, two non-metric trailer
//! columns and `"-"` as its missing-value placeholder. Preprocessing turns
//! that into a tidy frame with one row per (firm, category, portfolio,
//! metric) cell and nulls for missing values.

use polars::prelude::*;

use crate::error::{DataError, Result};
use crate::workbook::{RawCell, RawSheet};
use ecldash_transform::classify_position;

/// Portfolio header row plus sub-metric header row.
const HEADER_ROWS: usize = 2;

/// Non-metric trailer columns at the right edge of the template.
const TRAILER_COLUMNS: usize = 2;

/// Placeholder the export writes for missing values.
const DASH_PLACEHOLDER: &str = "-";

/// Plan for one surviving metric column.
struct ColumnKey {
    index: usize,
    category: &'static str,
    portfolio: String,
    metric: String,
}

/// Normalize a raw grid into a tidy table with columns
/// `firm`, `category`, `portfolio`, `metric`, `value`.
///
/// Aborts with [`DataError::UnclassifiedColumn`] when a metric column's
/// position falls outside the template's classification ranges: the layout
/// changed, and silently misclassifying would corrupt every downstream
/// number.
pub fn preprocess(sheet: &RawSheet) -> Result<DataFrame> {
    let rows = sheet.rows();
    if rows.len() < HEADER_ROWS {
        return Err(DataError::Layout(format!(
            "expected at least {HEADER_ROWS} header rows, got {} rows",
            rows.len()
        )));
    }
    let portfolio_row = &rows[0];
    let metric_row = &rows[1];

    let width = portfolio_row.len().max(metric_row.len());
    if width <= 1 + TRAILER_COLUMNS {
        return Err(DataError::Layout(format!(
            "expected a firm column, metric columns and {TRAILER_COLUMNS} trailer columns, \
             got {width} columns"
        )));
    }
    // Trailer columns are dropped before classification; everything left of
    // them must classify.
    let metric_end = width - TRAILER_COLUMNS;

    let keys = column_keys(portfolio_row, metric_row, metric_end)?;

    let mut firms: Vec<String> = Vec::new();
    let mut categories: Vec<&'static str> = Vec::new();
    let mut portfolios: Vec<String> = Vec::new();
    let mut metrics: Vec<String> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();

    for row in &rows[HEADER_ROWS..] {
        let Some(firm) = row.first().and_then(RawCell::text) else {
            continue;
        };
        for key in &keys {
            firms.push(firm.to_string());
            categories.push(key.category);
            portfolios.push(key.portfolio.clone());
            metrics.push(key.metric.clone());
            values.push(cell_value(row.get(key.index)));
        }
    }

    let tidy = df!(
        "firm" => firms,
        "category" => categories,
        "portfolio" => portfolios,
        "metric" => metrics,
        "value" => values,
    )?;

    Ok(tidy)
}

/// Build the per-column keys: classify by position, forward-fill the sparse
/// portfolio header, and drop columns without a sub-metric label.
fn column_keys(
    portfolio_row: &[RawCell],
    metric_row: &[RawCell],
    metric_end: usize,
) -> Result<Vec<ColumnKey>> {
    let mut keys = Vec::with_capacity(metric_end.saturating_sub(1));
    let mut current_portfolio: Option<String> = None;

    for index in 1..metric_end {
        let category = classify_position(index)
            .ok_or(DataError::UnclassifiedColumn { position: index })?;

        if let Some(label) = portfolio_row.get(index).and_then(RawCell::text) {
            current_portfolio = Some(label.to_string());
        }

        let Some(metric) = metric_row.get(index).and_then(RawCell::text) else {
            continue;
        };
        let Some(portfolio) = current_portfolio.clone() else {
            // No portfolio label has appeared yet; the column cannot be
            // addressed by any slice, so it is skipped.
            tracing::debug!(position = index, metric, "metric column before first portfolio label");
            continue;
        };

        keys.push(ColumnKey {
            index,
            category: category.as_str(),
            portfolio,
            metric: metric.to_string(),
        });
    }

    Ok(keys)
}

fn cell_value(cell: Option<&RawCell>) -> Option<f64> {
    match cell {
        Some(RawCell::Number(v)) => Some(*v),
        Some(RawCell::Text(s)) => {
            let trimmed = s.trim();
            if trimmed == DASH_PLACEHOLDER {
                None
            } else {
                trimmed.parse().ok()
            }
        }
        Some(RawCell::Empty) | None => None,
    }
}
