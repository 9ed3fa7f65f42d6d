//! Model Response Handling
//!
//! Text-level cleanup and JSON-array location for raw model output.
//! Decoding into buckets lives with the extractors.

mod json_extract;

pub use json_extract::{locate_json_array, strip_markdown};
