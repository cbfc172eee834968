//! Pivoting by reporting quarter and pairwise relative-change computation.

use polars::prelude::pivot::pivot_stable;
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::quarter::ReportingQuarter;

/// Request-scoped row filters for the pivoted table.
///
/// An empty list means "no filter" for that axis. A requested firm or
/// portfolio absent from the data simply matches nothing; the result is
/// smaller (possibly empty), never an error and never an all-null row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Firms to keep
    pub firms: Vec<String>,
    /// Portfolios to keep
    pub portfolios: Vec<String>,
}

impl Selection {
    /// Filter by firms only.
    pub fn firms(firms: Vec<String>) -> Self {
        Self {
            firms,
            portfolios: Vec::new(),
        }
    }
}

/// Pivot a long-format table to (firm, portfolio) rows with one value column
/// per quarter label, quarter columns sorted ascending.
pub fn pivot_by_quarter(long: &DataFrame) -> Result<DataFrame> {
    let wide = pivot_stable(
        long,
        ["quarter"],
        Some(["firm", "portfolio"]),
        Some(["value"]),
        true,
        None,
        None,
    )?;
    Ok(wide)
}

/// Keep only the rows matching the selection.
pub fn filter_selection(df: &DataFrame, selection: &Selection) -> Result<DataFrame> {
    let mut lf = df.clone().lazy();
    if !selection.firms.is_empty() {
        let firms = Series::new("firms".into(), selection.firms.as_slice());
        lf = lf.filter(col("firm").is_in(lit(firms)));
    }
    if !selection.portfolios.is_empty() {
        let portfolios = Series::new("portfolios".into(), selection.portfolios.as_slice());
        lf = lf.filter(col("portfolio").is_in(lit(portfolios)));
    }
    Ok(lf.collect()?)
}

/// Compute the relative change `newer / older - 1` for every unordered pair
/// of distinct quarters, older always preceding newer within a pair.
///
/// Input is a pivoted table with one column per quarter label. The output
/// keeps `firm` and `portfolio` plus one column per pair, labeled
/// `"<newer> vs <older>"` (e.g. `"2020-Q4 vs 2019-Q4"`). A zero or missing
/// denominator, or a missing numerator, yields null. Fewer than two distinct
/// quarters is a domain error.
pub fn relative_changes(
    pivoted: &DataFrame,
    quarters: &[ReportingQuarter],
) -> Result<DataFrame> {
    let mut quarters = quarters.to_vec();
    quarters.sort_unstable();
    quarters.dedup();
    if quarters.len() < 2 {
        return Err(TransformError::InsufficientPeriods {
            found: quarters.len(),
        });
    }

    let columns = pivoted.get_column_names_str();
    for quarter in &quarters {
        let label = quarter.to_string();
        if !columns.iter().any(|c| **c == label) {
            return Err(TransformError::QuarterMissing(label));
        }
    }

    let mut exprs = vec![col("firm"), col("portfolio")];
    for (i, older) in quarters.iter().enumerate() {
        for newer in &quarters[i + 1..] {
            let old_label = older.to_string();
            let new_label = newer.to_string();
            let pair_label = format!("{new_label} vs {old_label}");
            let old = col(old_label.as_str());
            let new = col(new_label.as_str());
            let change = when(
                old.clone()
                    .eq(lit(0.0))
                    .or(old.clone().is_null())
                    .or(new.clone().is_null()),
            )
            .then(lit(NULL))
            .otherwise(new / old - lit(1.0))
            .alias(pair_label.as_str());
            exprs.push(change);
        }
    }

    Ok(pivoted.clone().lazy().select(exprs).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quarters(tokens: &[&str]) -> Vec<ReportingQuarter> {
        tokens.iter().map(|t| t.parse().unwrap()).collect()
    }

    fn long_fixture() -> DataFrame {
        df!(
            "firm" => ["Alpha", "Alpha", "Beta", "Beta"],
            "portfolio" => ["Total", "Total", "Total", "Total"],
            "quarter" => ["2019-Q4", "2020-Q4", "2019-Q4", "2020-Q4"],
            "value" => [100.0, 120.0, 200.0, 190.0],
        )
        .unwrap()
    }

    fn changes_at(df: &DataFrame, pair: &str, row: usize) -> Option<f64> {
        df.column(pair).unwrap().f64().unwrap().get(row)
    }

    #[test]
    fn end_to_end_pair_change() {
        let pivoted = pivot_by_quarter(&long_fixture()).unwrap();
        let changes = relative_changes(&pivoted, &quarters(&["4Q19", "4Q20"])).unwrap();

        assert_eq!(changes.shape(), (2, 3));
        let pair = "2020-Q4 vs 2019-Q4";
        assert_relative_eq!(changes_at(&changes, pair, 0).unwrap(), 0.20);
        assert_relative_eq!(changes_at(&changes, pair, 1).unwrap(), -0.05);
    }

    #[test]
    fn change_is_not_sign_symmetric() {
        let long = df!(
            "firm" => ["Alpha", "Alpha"],
            "portfolio" => ["Total", "Total"],
            "quarter" => ["2019-Q4", "2020-Q4"],
            "value" => [100.0, 150.0],
        )
        .unwrap();
        let swapped = df!(
            "firm" => ["Alpha", "Alpha"],
            "portfolio" => ["Total", "Total"],
            "quarter" => ["2019-Q4", "2020-Q4"],
            "value" => [150.0, 100.0],
        )
        .unwrap();

        let pair = "2020-Q4 vs 2019-Q4";
        let qs = quarters(&["4Q19", "4Q20"]);
        let up = relative_changes(&pivot_by_quarter(&long).unwrap(), &qs).unwrap();
        let down = relative_changes(&pivot_by_quarter(&swapped).unwrap(), &qs).unwrap();

        assert_relative_eq!(changes_at(&up, pair, 0).unwrap(), 0.5);
        assert_relative_eq!(
            changes_at(&down, pair, 0).unwrap(),
            -1.0 / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn all_pairs_in_date_order() {
        let long = df!(
            "firm" => ["Alpha", "Alpha", "Alpha"],
            "portfolio" => ["Total", "Total", "Total"],
            "quarter" => ["2019-Q4", "2020-Q2", "2020-Q4"],
            "value" => [100.0, 110.0, 121.0],
        )
        .unwrap();

        let pivoted = pivot_by_quarter(&long).unwrap();
        // deliberately unsorted input order
        let changes =
            relative_changes(&pivoted, &quarters(&["4Q20", "4Q19", "2Q20"])).unwrap();

        let names: Vec<String> = changes
            .get_column_names_str()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            names,
            vec![
                "firm",
                "portfolio",
                "2020-Q2 vs 2019-Q4",
                "2020-Q4 vs 2019-Q4",
                "2020-Q4 vs 2020-Q2",
            ]
        );
        assert_relative_eq!(
            changes_at(&changes, "2020-Q4 vs 2019-Q4", 0).unwrap(),
            0.21,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_or_missing_denominator_yields_null() {
        let long = df!(
            "firm" => ["Alpha", "Alpha", "Beta", "Beta"],
            "portfolio" => ["Total", "Total", "Total", "Total"],
            "quarter" => ["2019-Q4", "2020-Q4", "2019-Q4", "2020-Q4"],
            "value" => [Some(0.0), Some(120.0), None, Some(190.0)],
        )
        .unwrap();

        let pivoted = pivot_by_quarter(&long).unwrap();
        let changes = relative_changes(&pivoted, &quarters(&["4Q19", "4Q20"])).unwrap();

        let pair = "2020-Q4 vs 2019-Q4";
        assert_eq!(changes_at(&changes, pair, 0), None);
        assert_eq!(changes_at(&changes, pair, 1), None);
    }

    #[test]
    fn fewer_than_two_periods_is_an_error() {
        let pivoted = pivot_by_quarter(&long_fixture()).unwrap();
        let err = relative_changes(&pivoted, &quarters(&["4Q19"])).unwrap_err();
        assert!(matches!(err, TransformError::InsufficientPeriods { found: 1 }));

        // duplicates collapse before the check
        let err = relative_changes(&pivoted, &quarters(&["4Q19", "4Q19"])).unwrap_err();
        assert!(matches!(err, TransformError::InsufficientPeriods { found: 1 }));
    }

    #[test]
    fn filter_keeps_only_selected_firms() {
        let pivoted = pivot_by_quarter(&long_fixture()).unwrap();
        let filtered =
            filter_selection(&pivoted, &Selection::firms(vec!["Beta".into()])).unwrap();
        assert_eq!(filtered.height(), 1);

        // absent firm: empty result, not an error, not an all-null row
        let empty =
            filter_selection(&pivoted, &Selection::firms(vec!["Gamma".into()])).unwrap();
        assert_eq!(empty.height(), 0);

        // empty selection: no filtering
        let all = filter_selection(&pivoted, &Selection::default()).unwrap();
        assert_eq!(all.height(), 2);
    }
}
