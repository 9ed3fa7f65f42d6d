pub mod bucket;
pub mod error;
pub mod taxonomy;

pub use bucket::{Bucket, BucketRecord, BucketSet};
pub use error::{ErrorCategory, ErrorClassifier, FinflowError, LlmError, Result};
pub use taxonomy::TaxonomyKey;
