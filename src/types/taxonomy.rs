//! Financial Line-Item Taxonomy
//!
//! The closed set of buckets the pipeline recognizes. Declaration order is the
//! taxonomy order used for bucket files, prompts and in-stage layout ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named financial line item.
///
/// `Ebit` and `Ebt` are normally derived during graph construction but may
/// also be supplied directly in a bucket file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxonomyKey {
    Products,
    Services,
    Revenue,
    CostOfRevenue,
    GrossProfit,
    OperatingExpenses,
    OperatingIncome,
    InterestExpense,
    InterestIncome,
    OtherIncomeExpense,
    Taxes,
    NetIncome,
    Ebit,
    Ebt,
}

impl TaxonomyKey {
    /// Every key, in taxonomy order.
    pub const ALL: [TaxonomyKey; 14] = [
        Self::Products,
        Self::Services,
        Self::Revenue,
        Self::CostOfRevenue,
        Self::GrossProfit,
        Self::OperatingExpenses,
        Self::OperatingIncome,
        Self::InterestExpense,
        Self::InterestIncome,
        Self::OtherIncomeExpense,
        Self::Taxes,
        Self::NetIncome,
        Self::Ebit,
        Self::Ebt,
    ];

    /// Keys requested from the source text. Always fully populated in a `BucketSet`.
    pub const EXTRACTED: [TaxonomyKey; 12] = [
        Self::Products,
        Self::Services,
        Self::Revenue,
        Self::CostOfRevenue,
        Self::GrossProfit,
        Self::OperatingExpenses,
        Self::OperatingIncome,
        Self::InterestExpense,
        Self::InterestIncome,
        Self::OtherIncomeExpense,
        Self::Taxes,
        Self::NetIncome,
    ];

    /// Label used in bucket files and model output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Services => "Services",
            Self::Revenue => "Revenue",
            Self::CostOfRevenue => "Cost of Revenue",
            Self::GrossProfit => "Gross Profit",
            Self::OperatingExpenses => "Operating Expenses",
            Self::OperatingIncome => "Operating Income",
            Self::InterestExpense => "Interest Expense",
            Self::InterestIncome => "Interest Income",
            Self::OtherIncomeExpense => "Other Income/Expense",
            Self::Taxes => "Taxes",
            Self::NetIncome => "Net Income",
            Self::Ebit => "EBIT",
            Self::Ebt => "EBT",
        }
    }

    /// Exact label lookup. Surrounding whitespace is ignored, case is not.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|key| key.label() == label)
    }

    /// Whether the key is only ever computed from other buckets by default.
    pub const fn is_derivable(self) -> bool {
        matches!(self, Self::Ebit | Self::Ebt)
    }
}

impl fmt::Display for TaxonomyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
