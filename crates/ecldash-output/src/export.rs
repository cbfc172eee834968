//! Export of change tables and figures to files.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::Figure;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One relative-change observation, flattened for CSV export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    /// Firm name.
    pub firm: String,

    /// Portfolio name.
    pub portfolio: String,

    /// Quarter-pair label, e.g. `"2020-Q4 vs 2019-Q4"`.
    pub pair: String,

    /// Relative change, empty where not computable.
    pub change: Option<f64>,
}

/// Flatten a relative-change table into one record per
/// (firm, portfolio, pair) cell.
pub fn change_records(changes: &DataFrame) -> Result<Vec<ChangeRecord>, ExportError> {
    let firms = changes.column("firm")?.str()?;
    let portfolios = changes.column("portfolio")?.str()?;
    let pairs: Vec<String> = changes
        .get_column_names_str()
        .into_iter()
        .filter(|name| *name != "firm" && *name != "portfolio")
        .map(String::from)
        .collect();

    let mut records = Vec::new();
    for pair in &pairs {
        let values = changes.column(pair)?.f64()?;
        for row in 0..changes.height() {
            let (Some(firm), Some(portfolio)) = (firms.get(row), portfolios.get(row)) else {
                continue;
            };
            records.push(ChangeRecord {
                firm: firm.to_string(),
                portfolio: portfolio.to_string(),
                pair: pair.clone(),
                change: values.get(row),
            });
        }
    }

    Ok(records)
}

/// Writes change tables and figure payloads into an output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter rooted at `output_dir` (created if absent).
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Write a relative-change table for one view; returns the file path.
    pub fn export_changes(
        &self,
        view_slug: &str,
        changes: &DataFrame,
        format: ExportFormat,
    ) -> Result<PathBuf, ExportError> {
        let path = self
            .output_dir
            .join(format!("{view_slug}_changes.{}", format.extension()));
        let records = change_records(changes)?;
        match format {
            ExportFormat::Csv => write_csv(&records, &path)?,
            ExportFormat::Json => {
                write_bytes(&serde_json::to_vec(&records)?, &path)?;
            }
            ExportFormat::PrettyJson => {
                write_bytes(&serde_json::to_vec_pretty(&records)?, &path)?;
            }
        }
        Ok(path)
    }

    /// Write the figure payloads for one view as JSON; returns the file path.
    pub fn export_figures(
        &self,
        view_slug: &str,
        figures: &[Figure],
    ) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(format!("{view_slug}_figures.json"));
        write_bytes(&serde_json::to_vec_pretty(figures)?, &path)?;
        Ok(path)
    }
}

fn write_csv(records: &[ChangeRecord], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_bytes(bytes: &[u8], path: &Path) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    Ok(())
}
