//! Chart payloads and export for ecldash.
//!
//! Turns relative-change tables into bar-chart figure descriptions for
//! client-side rendering, and writes change tables and figures to CSV or
//! JSON files.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;

pub use chart::{quarter_change_figures, BarTrace, ChartError, Figure, FigureLayout};
pub use export::{ChangeRecord, ExportError, ExportFormat, Exporter};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
