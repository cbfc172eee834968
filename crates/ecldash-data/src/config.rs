//! Segment configuration.
//!
//! The segments (named peer groups such as "UK" and "GROUP"), their firm
//! lists, available quarters and workbook directories live in a TOML file
//! rather than in code, so template or firm-list changes never touch the
//! pipeline.
//!
//! ```toml
//! [segments.UK]
//! data_dir = "dataset/UK"
//! firms = ["HSBC - UK", "Nationwide"]
//! dates = ["4Q19", "2Q20", "4Q20"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DataError, Result};
use ecldash_transform::ReportingQuarter;

/// Top-level configuration: the known segments.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Segment name to segment definition.
    pub segments: BTreeMap<String, SegmentConfig>,
}

/// One segment: where its workbooks live and which firms and quarters it
/// offers.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentConfig {
    /// Directory holding one `<token>.xlsx` workbook per quarter.
    pub data_dir: PathBuf,
    /// Firms available for selection within this segment.
    pub firms: Vec<String>,
    /// Quarter tokens (e.g. `"4Q20"`) with an available workbook.
    pub dates: Vec<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        // Fail at load time, not mid-request, when a date token is bad.
        for segment in config.segments.values() {
            segment.quarters()?;
        }
        Ok(config)
    }

    /// Look a segment up by name.
    pub fn segment(&self, name: &str) -> Result<&SegmentConfig> {
        self.segments
            .get(name)
            .ok_or_else(|| DataError::UnknownSegment(name.to_string()))
    }
}

impl SegmentConfig {
    /// Parsed reporting quarters, in configuration order.
    pub fn quarters(&self) -> Result<Vec<ReportingQuarter>> {
        Ok(ReportingQuarter::parse_all(&self.dates)?)
    }

    /// Path of the workbook for one quarter.
    pub fn workbook_path(&self, quarter: &ReportingQuarter) -> PathBuf {
        self.data_dir.join(format!("{}.xlsx", quarter.file_token()))
    }
}
