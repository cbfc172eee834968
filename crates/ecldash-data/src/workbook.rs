//! Raw workbook loading.
//!
//! Each source workbook carries two decorative banner rows, a positional
//! name row and one irrelevant filler row above the real grid; the loader
//! skips all four so downstream code sees row 0 = portfolio header,
//! row 1 = sub-metric header, rows 2+ = firm rows.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::DataFrame;

use crate::config::SegmentConfig;
use crate::error::{DataError, Result};
use crate::preprocess::preprocess;
use ecldash_transform::ReportingQuarter;

/// Banner rows above the grid, the positional name row below them, and one
/// irrelevant filler row above the portfolio header.
const SKIP_ROWS: usize = 4;

/// A spreadsheet cell reduced to what ingestion cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Textual content
    Text(String),
    /// Numeric content
    Number(f64),
    /// Blank or unreadable
    Empty,
}

impl RawCell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::String(s) => Self::Text(s.clone()),
            Data::Float(v) => Self::Number(*v),
            Data::Int(v) => Self::Number(*v as f64),
            Data::Bool(b) => Self::Number(f64::from(*b)),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Error(_) | Data::Empty => Self::Empty,
        }
    }

    /// Trimmed, non-empty text content, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}

/// A raw cell grid with the banner rows already stripped.
#[derive(Debug, Clone)]
pub struct RawSheet {
    rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    /// Wrap a cell grid.
    pub fn new(rows: Vec<Vec<RawCell>>) -> Self {
        Self { rows }
    }

    /// The grid rows, header rows first.
    pub fn rows(&self) -> &[Vec<RawCell>] {
        &self.rows
    }
}

/// Load the first worksheet of a workbook as a [`RawSheet`].
pub fn load_raw_sheet(path: &Path) -> Result<RawSheet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DataError::Layout(format!("{} has no worksheets", path.display())))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let rows = range
        .rows()
        .skip(SKIP_ROWS)
        .map(|row| row.iter().map(RawCell::from_data).collect())
        .collect();

    Ok(RawSheet::new(rows))
}

/// Load and preprocess one workbook per requested quarter for a segment.
///
/// Workbooks are read fresh on every call; nothing is cached between
/// requests, so concurrent callers never share a table.
pub fn load_segment_quarters(
    segment: &SegmentConfig,
    quarters: &[ReportingQuarter],
) -> Result<BTreeMap<ReportingQuarter, DataFrame>> {
    let mut tables = BTreeMap::new();
    for quarter in quarters {
        let path = segment.workbook_path(quarter);
        if !path.is_file() {
            return Err(DataError::MissingWorkbook {
                quarter: quarter.to_string(),
                path,
            });
        }
        tracing::debug!(quarter = %quarter, path = %path.display(), "loading workbook");
        let sheet = load_raw_sheet(&path)?;
        tables.insert(*quarter, preprocess(&sheet)?);
    }
    Ok(tables)
}
