//! Buckets and Bucket Sets
//!
//! A `BucketSet` is created fresh per extraction run and treated as
//! copy-on-write by every stage after extraction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::taxonomy::TaxonomyKey;

/// One taxonomy entry's value in millions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: TaxonomyKey,
    pub value: f64,
    pub is_derived: bool,
}

impl Bucket {
    pub fn reported(name: TaxonomyKey, value: f64) -> Self {
        Self {
            name,
            value,
            is_derived: false,
        }
    }

    pub fn derived(name: TaxonomyKey, value: f64) -> Self {
        Self {
            name,
            value,
            is_derived: true,
        }
    }
}

/// Ordered mapping from taxonomy key to bucket.
///
/// Every key in [`TaxonomyKey::EXTRACTED`] is always populated (0.0 when
/// unknown). `EBIT`/`EBT` appear only once supplied or derived.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSet {
    buckets: BTreeMap<TaxonomyKey, Bucket>,
}

impl Default for BucketSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketSet {
    pub fn new() -> Self {
        let buckets = TaxonomyKey::EXTRACTED
            .into_iter()
            .map(|key| (key, Bucket::reported(key, 0.0)))
            .collect();
        Self { buckets }
    }

    /// Builder-style setter for reported values.
    pub fn with(mut self, key: TaxonomyKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Value for `key`, 0.0 when absent.
    pub fn value(&self, key: TaxonomyKey) -> f64 {
        self.buckets.get(&key).map_or(0.0, |b| b.value)
    }

    pub fn get(&self, key: TaxonomyKey) -> Option<&Bucket> {
        self.buckets.get(&key)
    }

    pub fn set(&mut self, key: TaxonomyKey, value: f64) {
        self.buckets.insert(key, Bucket::reported(key, value));
    }

    pub fn set_derived(&mut self, key: TaxonomyKey, value: f64) {
        self.buckets.insert(key, Bucket::derived(key, value));
    }

    /// A bucket is present when it carries a non-default value.
    pub fn is_present(&self, key: TaxonomyKey) -> bool {
        self.value(key) != 0.0
    }

    pub fn is_derived(&self, key: TaxonomyKey) -> bool {
        self.buckets.get(&key).is_some_and(|b| b.is_derived)
    }

    /// Buckets in taxonomy order.
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.values()
    }

    pub fn all_zero(&self) -> bool {
        self.buckets.values().all(|b| b.value == 0.0)
    }
}

/// One record of a bucket file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub bucket: String,
    pub value: f64,
}

impl From<&BucketSet> for Vec<BucketRecord> {
    /// Reported buckets only; derived values are recomputed at graph time.
    fn from(set: &BucketSet) -> Self {
        set.iter()
            .filter(|b| !b.is_derived)
            .filter(|b| !b.name.is_derivable() || b.value != 0.0)
            .map(|b| BucketRecord {
                bucket: b.name.label().to_string(),
                value: b.value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_is_fully_populated() {
        let set = BucketSet::new();
        for key in TaxonomyKey::EXTRACTED {
            assert_eq!(set.get(key).map(|b| b.value), Some(0.0));
        }
        assert!(set.get(TaxonomyKey::Ebit).is_none());
        assert!(set.all_zero());
    }

    #[test]
    fn test_presence_is_non_default_value() {
        let set = BucketSet::new()
            .with(TaxonomyKey::Revenue, 1000.0)
            .with(TaxonomyKey::OtherIncomeExpense, -20.0);
        assert!(set.is_present(TaxonomyKey::Revenue));
        assert!(set.is_present(TaxonomyKey::OtherIncomeExpense));
        assert!(!set.is_present(TaxonomyKey::Products));
        assert!(!set.is_present(TaxonomyKey::Ebt));
    }

    #[test]
    fn test_records_skip_derived_and_keep_order() {
        let mut set = BucketSet::new().with(TaxonomyKey::NetIncome, 10.0);
        set.set_derived(TaxonomyKey::Ebit, 12.0);
        let records: Vec<BucketRecord> = (&set).into();

        assert_eq!(records.len(), 12);
        assert_eq!(records[0].bucket, "Products");
        assert_eq!(records[11].bucket, "Net Income");
        assert_eq!(records[11].value, 10.0);
        assert!(records.iter().all(|r| r.bucket != "EBIT"));
    }

    #[test]
    fn test_records_keep_supplied_ebit() {
        let set = BucketSet::new().with(TaxonomyKey::Ebit, 50.0);
        let records: Vec<BucketRecord> = (&set).into();
        assert_eq!(records.last().map(|r| r.bucket.as_str()), Some("EBIT"));
    }
}
