//! Bar-chart figure descriptions.
//!
//! The dashboard renders client-side from a JSON figure payload: one bar
//! chart per quarter pair, bar groups keyed by firm, one trace per
//! portfolio, bar value = relative change.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building figure payloads.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One bar series: a portfolio's change per firm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarTrace {
    /// Trace type, always `"bar"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Series name (the portfolio).
    pub name: String,

    /// Bar group keys (firm names).
    pub x: Vec<String>,

    /// Bar values; null where the change was not computable.
    pub y: Vec<Option<f64>>,
}

/// Figure layout hints for the client-side renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureLayout {
    /// Style template name.
    pub template: String,

    /// Figure title.
    pub title: String,

    /// Y-axis label.
    pub yaxis_title: String,

    /// Legend orientation, `"h"` for horizontal.
    pub legend_orientation: String,
}

impl FigureLayout {
    fn new(title: String, yaxis_title: &str) -> Self {
        Self {
            template: "ggplot2".to_string(),
            title,
            yaxis_title: yaxis_title.to_string(),
            legend_orientation: "h".to_string(),
        }
    }
}

/// A complete bar-chart description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Figure {
    /// Bar traces, one per portfolio.
    pub data: Vec<BarTrace>,

    /// Layout hints.
    pub layout: FigureLayout,
}

/// Build one figure per quarter-pair column of a relative-change table.
///
/// The table must carry `firm` and `portfolio` columns; every other column
/// is treated as a quarter pair. Figure titles combine the view label with
/// the pair label, e.g. `"ECL: 2020-Q4 vs 2019-Q4"`.
pub fn quarter_change_figures(
    changes: &DataFrame,
    view_label: &str,
) -> Result<Vec<Figure>, ChartError> {
    let firms = changes.column("firm")?.str()?;
    let portfolios = changes.column("portfolio")?.str()?;

    let pair_columns: Vec<String> = changes
        .get_column_names_str()
        .into_iter()
        .filter(|name| *name != "firm" && *name != "portfolio")
        .map(String::from)
        .collect();

    let mut figures = Vec::with_capacity(pair_columns.len());
    for pair in &pair_columns {
        let values = changes.column(pair)?.f64()?;

        // One trace per portfolio, in order of first appearance.
        let mut order: Vec<String> = Vec::new();
        let mut traces: Vec<BarTrace> = Vec::new();
        for row in 0..changes.height() {
            let (Some(firm), Some(portfolio)) = (firms.get(row), portfolios.get(row)) else {
                continue;
            };
            let index = match order.iter().position(|p| p == portfolio) {
                Some(index) => index,
                None => {
                    order.push(portfolio.to_string());
                    traces.push(BarTrace {
                        kind: "bar".to_string(),
                        name: portfolio.to_string(),
                        x: Vec::new(),
                        y: Vec::new(),
                    });
                    traces.len() - 1
                }
            };
            traces[index].x.push(firm.to_string());
            traces[index].y.push(values.get(row));
        }

        figures.push(Figure {
            data: traces,
            layout: FigureLayout::new(format!("{view_label}: {pair}"), "% Change"),
        });
    }

    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes_fixture() -> DataFrame {
        df!(
            "firm" => ["Alpha", "Alpha", "Beta", "Beta"],
            "portfolio" => ["Total", "Mortgages", "Total", "Mortgages"],
            "2020-Q4 vs 2019-Q4" => [Some(0.20), Some(0.10), Some(-0.05), None],
        )
        .unwrap()
    }

    #[test]
    fn one_figure_per_pair_one_trace_per_portfolio() {
        let figures = quarter_change_figures(&changes_fixture(), "ECL").unwrap();
        assert_eq!(figures.len(), 1);

        let figure = &figures[0];
        assert_eq!(figure.layout.title, "ECL: 2020-Q4 vs 2019-Q4");
        assert_eq!(figure.layout.yaxis_title, "% Change");
        assert_eq!(figure.data.len(), 2);

        let total = &figure.data[0];
        assert_eq!(total.name, "Total");
        assert_eq!(total.x, vec!["Alpha", "Beta"]);
        assert_eq!(total.y, vec![Some(0.20), Some(-0.05)]);

        let mortgages = &figure.data[1];
        assert_eq!(mortgages.name, "Mortgages");
        assert_eq!(mortgages.y, vec![Some(0.10), None]);
    }

    #[test]
    fn payload_serializes_with_plotly_field_names() {
        let figures = quarter_change_figures(&changes_fixture(), "ECL").unwrap();
        let json = serde_json::to_value(&figures[0]).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["layout"]["template"], "ggplot2");
        assert!(json["data"][0]["y"][0].is_number());
    }

    #[test]
    fn no_pair_columns_means_no_figures() {
        let df = df!(
            "firm" => ["Alpha"],
            "portfolio" => ["Total"],
        )
        .unwrap();
        let figures = quarter_change_figures(&df, "ECL").unwrap();
        assert!(figures.is_empty());
    }
}
