//! Combining several quarters' sliced tables into one long-format table.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::quarter::ReportingQuarter;
use crate::slice::{slice_metric, MetricSlice};

/// Slice every requested quarter's tidy table and stack them into a
/// long-format table: one row per (firm, portfolio, quarter), with a `date`
/// column (polars Date) and a `quarter` label column, sorted by firm then
/// date ascending.
///
/// Firms repeat across quarters; a quarter with no loaded table is an error.
pub fn combine_quarters(
    tables: &BTreeMap<ReportingQuarter, DataFrame>,
    quarters: &[ReportingQuarter],
    slice: &MetricSlice,
) -> Result<DataFrame> {
    let mut parts = Vec::with_capacity(quarters.len());
    for quarter in quarters {
        let tidy = tables
            .get(quarter)
            .ok_or_else(|| TransformError::QuarterMissing(quarter.to_string()))?;
        let sliced = slice_metric(tidy, slice)?;
        let part = sliced.lazy().with_columns([
            lit(quarter.date().to_string())
                .cast(DataType::Date)
                .alias("date"),
            lit(quarter.to_string()).alias("quarter"),
        ]);
        parts.push(part);
    }

    let combined = concat(parts, UnionArgs::default())?
        .sort(["firm", "date"], SortMultipleOptions::default())
        .collect()?;

    Ok(combined)
}
