//! Reporting quarters and their compact source tokens.
//!
//! Source workbooks are named by tokens of the form `"<quarter>Q<yy>"`
//! (`"4Q20"` = Q4 2020). A quarter maps to the first day of its closing
//! month, so chronological order equals the derived (year, quarter) order.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TransformError;

/// A fiscal reporting quarter.
///
/// Ordering is chronological (field order makes the derived `Ord` compare
/// year first, then quarter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportingQuarter {
    year: i32,
    quarter: u8,
}

impl ReportingQuarter {
    /// Create a quarter, validating `quarter` is 1 through 4.
    pub fn new(year: i32, quarter: u8) -> Result<Self, TransformError> {
        if !(1..=4).contains(&quarter) {
            return Err(TransformError::InvalidQuarterToken(format!(
                "{quarter}Q{year}"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Quarter number, 1 through 4.
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// First day of the quarter's closing month, e.g. Q4 2020 -> 2020-12-01.
    pub fn date(&self) -> NaiveDate {
        // quarter is validated to 1..=4 so the month is always 3, 6, 9 or 12
        NaiveDate::from_ymd_opt(self.year, u32::from(self.quarter) * 3, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Compact token used in source file names, e.g. `"4Q20"`.
    pub fn file_token(&self) -> String {
        format!("{}Q{:02}", self.quarter, self.year.rem_euclid(100))
    }

    /// Parse a list of tokens, preserving order.
    pub fn parse_all(tokens: &[String]) -> Result<Vec<Self>, TransformError> {
        tokens.iter().map(|t| t.parse()).collect()
    }
}

impl fmt::Display for ReportingQuarter {
    /// Canonical label, e.g. `"2020-Q4"`. Lexicographic order on labels
    /// matches chronological order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for ReportingQuarter {
    type Err = TransformError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let err = || TransformError::InvalidQuarterToken(token.to_string());
        let (q, yy) = token.split_once('Q').ok_or_else(err)?;
        let quarter: u8 = q.trim().parse().map_err(|_| err())?;
        let yy: i32 = yy.trim().parse().map_err(|_| err())?;
        if !(0..100).contains(&yy) {
            return Err(err());
        }
        Self::new(2000 + yy, quarter).map_err(|_| err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    #[case("4Q20", 2020, 4, NaiveDate::from_ymd_opt(2020, 12, 1).unwrap())]
    #[case("2Q20", 2020, 2, NaiveDate::from_ymd_opt(2020, 6, 1).unwrap())]
    #[case("1Q19", 2019, 1, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap())]
    #[case("3Q05", 2005, 3, NaiveDate::from_ymd_opt(2005, 9, 1).unwrap())]
    fn parses_tokens(
        #[case] token: &str,
        #[case] year: i32,
        #[case] quarter: u8,
        #[case] date: NaiveDate,
    ) {
        let q: ReportingQuarter = token.parse().unwrap();
        assert_eq!(q.year(), year);
        assert_eq!(q.quarter(), quarter);
        assert_eq!(q.date(), date);
        assert_eq!(q.file_token(), token);
    }

    #[rstest]
    #[case("5Q20")]
    #[case("0Q20")]
    #[case("Q20")]
    #[case("4Q")]
    #[case("4Q202")]
    #[case("2020-Q4")]
    #[case("")]
    fn rejects_bad_tokens(#[case] token: &str) {
        assert!(token.parse::<ReportingQuarter>().is_err());
    }

    #[test]
    fn ordering_matches_chronology() {
        let mut quarters: Vec<ReportingQuarter> = ["4Q20", "4Q19", "2Q20", "1Q21"]
            .iter()
            .map(|t| t.parse().unwrap())
            .collect();
        quarters.sort_unstable();

        let dates: Vec<_> = quarters.iter().map(ReportingQuarter::date).collect();
        let mut sorted = dates.clone();
        sorted.sort_unstable();
        assert_eq!(dates, sorted);

        let labels: Vec<_> = quarters.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["2019-Q4", "2020-Q2", "2020-Q4", "2021-Q1"]);
        let mut lex = labels.clone();
        lex.sort_unstable();
        assert_eq!(labels, lex, "label order must equal chronological order");
    }
}
