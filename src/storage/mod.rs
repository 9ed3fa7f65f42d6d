//! Flat-file persistence for bucket sets and chart output.

pub mod bucket_file;

pub use bucket_file::{default_buckets_path, read_bucket_file, write_bucket_file};
