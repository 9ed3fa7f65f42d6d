//! Pattern-Table Extraction
//!
//! Deterministic extraction used when the model output is unusable. Each
//! taxonomy key has an ordered list of label synonyms; the first pattern that
//! matches and parses wins, even when its value is 0.0.

use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

use super::value::parse_millions;
use crate::types::{BucketSet, TaxonomyKey};

/// Everything after the label: filler, optional `$`, the literal, optional unit.
const VALUE_SUFFIX: &str = r"[^0-9$]*\$?([\d,]+(?:\.\d+)?)(?:\s*(million|billion|m|b|M|B))?";

/// Ordered label patterns for one taxonomy key.
#[derive(Debug, Clone)]
pub struct LabelPatterns {
    pub key: TaxonomyKey,
    pub patterns: Vec<Regex>,
}

impl LabelPatterns {
    /// Compile label expressions, each followed by the shared value suffix.
    ///
    /// Group 1 must capture the literal and group 2 the optional unit.
    pub fn new(key: TaxonomyKey, labels: &[&str]) -> Result<Self, regex::Error> {
        let patterns = labels
            .iter()
            .map(|label| {
                RegexBuilder::new(&format!("{}{}", label, VALUE_SUFFIX))
                    .case_insensitive(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { key, patterns })
    }
}

fn label_synonyms(key: TaxonomyKey) -> &'static [&'static str] {
    match key {
        TaxonomyKey::Products => &[r"Products(?:\s+revenue)?", r"Product\s+sales"],
        TaxonomyKey::Services => &[r"Services(?:\s+revenue)?", r"Service\s+revenue"],
        TaxonomyKey::Revenue => &[r"(?:Total\s+)?Revenue", r"Net\s+sales"],
        TaxonomyKey::CostOfRevenue => &[r"Cost\s+of\s+(?:Revenue|Sales)", r"COGS"],
        TaxonomyKey::GrossProfit => &[r"Gross\s+Profit", r"Gross\s+Margin"],
        TaxonomyKey::OperatingExpenses => &[r"Operating\s+Expenses", r"(?:Total\s+)?OPEX"],
        TaxonomyKey::OperatingIncome => &[
            r"Operating\s+Income",
            r"Income\s+from\s+operations",
            r"Operating\s+(?:profit|earnings)",
        ],
        TaxonomyKey::InterestExpense => &[r"Interest\s+Expense", r"Interest\s+expenses"],
        TaxonomyKey::InterestIncome => &[r"Interest\s+Income", r"Interest\s+earned"],
        TaxonomyKey::OtherIncomeExpense => &[
            r"Other\s+Income(?:/Expense)?",
            r"Other\s+income\s+and\s+expense",
        ],
        TaxonomyKey::Taxes => &[
            r"(?:Income\s+)?Tax(?:es)?(?:\s+Expense)?",
            r"Provision\s+for\s+(?:income\s+)?taxes",
        ],
        TaxonomyKey::NetIncome => &[r"Net\s+Income", r"Net\s+Earnings", r"Net\s+Profit"],
        TaxonomyKey::Ebit | TaxonomyKey::Ebt => &[],
    }
}

/// Built-in table, compiled once.
static DEFAULT_PATTERNS: LazyLock<Vec<LabelPatterns>> = LazyLock::new(|| {
    TaxonomyKey::EXTRACTED
        .into_iter()
        .map(|key| LabelPatterns::new(key, label_synonyms(key)).unwrap())
        .collect()
});

pub struct FallbackExtractor {
    table: Cow<'static, [LabelPatterns]>,
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackExtractor {
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(DEFAULT_PATTERNS.as_slice()),
        }
    }

    pub fn with_patterns(table: Vec<LabelPatterns>) -> Self {
        Self {
            table: Cow::Owned(table),
        }
    }

    /// Scan `text` and return a fully populated set. Makes no external calls.
    pub fn extract(&self, text: &str) -> BucketSet {
        let mut buckets = BucketSet::new();

        for entry in self.table.iter() {
            if let Some(value) = Self::first_match(entry, text) {
                debug!("Pattern match for {}: {} million", entry.key, value);
                buckets.set(entry.key, value);
            }
        }

        buckets
    }

    /// First pattern whose captured literal parses. A parse failure moves on
    /// to the next pattern; it does not retry later occurrences.
    fn first_match(entry: &LabelPatterns, text: &str) -> Option<f64> {
        entry.patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(text)?;
            let literal = caps.get(1)?.as_str();
            let unit = caps.get(2).map(|m| m.as_str());
            parse_millions(literal, unit)
        })
    }
}
