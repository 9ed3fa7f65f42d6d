//! Bucket File
//!
//! JSON array of `{"bucket": <label>, "value": <millions>}` records.
//! Absent taxonomy entries read back as 0.0.

use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{BucketRecord, BucketSet, FinflowError, Result, TaxonomyKey};

/// `<dir>/<stem>_buckets.json` next to the summary file.
pub fn default_buckets_path(summary: &Path) -> PathBuf {
    sibling_with_suffix(summary, "_buckets.json")
}

pub(crate) fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{}{}", stem, suffix))
}

/// Write every reported bucket in taxonomy order.
pub fn write_bucket_file(path: &Path, buckets: &BucketSet) -> Result<()> {
    let records: Vec<BucketRecord> = buckets.into();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(path, json)?;
    debug!("Wrote {} buckets to {}", records.len(), path.display());
    Ok(())
}

/// Read a bucket file into a fully populated set.
///
/// Unknown labels and non-numeric values are skipped; a document that is not
/// a JSON array is rejected.
pub fn read_bucket_file(path: &Path) -> Result<BucketSet> {
    if !path.exists() {
        return Err(FinflowError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content).map_err(|e| FinflowError::BucketFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let Value::Array(items) = document else {
        return Err(FinflowError::BucketFile {
            path: path.to_path_buf(),
            message: "expected a JSON array of bucket records".to_string(),
        });
    };

    let mut set = BucketSet::new();
    let mut seen = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        let Some(label) = item.get("bucket").and_then(Value::as_str) else {
            warn!("Record {} has no bucket label, skipping", index);
            continue;
        };
        let Some(key) = TaxonomyKey::from_label(label) else {
            warn!("Unknown bucket '{}' in {}, skipping", label, path.display());
            continue;
        };
        let Some(value) = item.get("value").and_then(Value::as_f64).filter(|v| v.is_finite())
        else {
            warn!("Bucket '{}' has no numeric value, skipping", label);
            continue;
        };
        if !seen.insert(key) {
            warn!("Duplicate bucket '{}', keeping the first", label);
            continue;
        }
        set.set(key, value);
    }

    Ok(set)
}
