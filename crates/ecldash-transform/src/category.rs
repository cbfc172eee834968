//! Business categories and the positional classification of raw columns.
//!
//! The disclosure template lays its ~194 metric columns out in a fixed
//! category order, so a column's 1-based position determines its category.
//! The mapping is kept as an explicit range table: a template change is a
//! data edit here, not a code change scattered over conditionals.

use std::fmt;
use std::str::FromStr;

use crate::error::TransformError;

/// One of the six fixed business groupings of disclosure metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Gross asset balances
    Assets,
    /// Expected credit loss allowances
    Ecl,
    /// Stage 1/2/3 balance shares
    StagingBalances,
    /// Stage 2 decomposition
    Stage2Analysis,
    /// Coverage ratios
    Coverage,
    /// Annualized loss rates
    LossRates,
}

impl Category {
    /// Label used in the source template and in all derived tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Ecl => "ECL",
            Self::StagingBalances => "Staging balances (%)",
            Self::Stage2Analysis => "Stage 2 Analysis",
            Self::Coverage => "Coverage (%)",
            Self::LossRates => "Loss rates",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORY_RANGES
            .iter()
            .map(|r| r.category)
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TransformError::CategoryMissing(s.to_string()))
    }
}

/// A half-open range of 1-based column positions assigned to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRange {
    /// First position in the range (inclusive, 1-based)
    pub start: usize,
    /// One past the last position in the range
    pub end: usize,
    /// Category assigned to every position in the range
    pub category: Category,
}

impl CategoryRange {
    const fn new(start: usize, end: usize, category: Category) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    /// Whether a 1-based column position falls in this range.
    pub const fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end
    }
}

/// Positional layout of the disclosure template, in column order.
///
/// Together the ranges partition positions `1..=194`; a metric column outside
/// them means the template changed and ingestion must abort.
pub const CATEGORY_RANGES: [CategoryRange; 6] = [
    CategoryRange::new(1, 58, Category::Assets),
    CategoryRange::new(58, 110, Category::Ecl),
    CategoryRange::new(110, 135, Category::StagingBalances),
    CategoryRange::new(135, 141, Category::Stage2Analysis),
    CategoryRange::new(141, 171, Category::Coverage),
    CategoryRange::new(171, 195, Category::LossRates),
];

/// Classify a metric column by its 1-based position in the template.
///
/// Returns `None` for positions the template does not define; callers treat
/// that as a fatal layout error rather than guessing.
pub fn classify_position(position: usize) -> Option<Category> {
    CATEGORY_RANGES
        .iter()
        .find(|r| r.contains(position))
        .map(|r| r.category)
}
