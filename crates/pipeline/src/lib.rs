//! CSV car import pipeline.
//!
//! Streams an uploaded file through the row validator, inserts the valid
//! records one at a time through a [`carbase_db::store::CarStore`], and
//! writes a plain-text report to the logs directory.

pub mod error;
pub mod import;
pub mod scan;

pub use error::PipelineError;
pub use import::{import_csv_file, ImportOutcome};
