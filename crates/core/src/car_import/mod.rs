//! CSV car import: row validation, result accounting, and the text report.
//!
//! Everything here is pure. Streaming, persistence, and file handling live in
//! the `carbase-pipeline` crate.

pub mod log;
pub mod result;
pub mod row;

pub use log::{is_safe_log_file_name, log_file_name, render_import_log};
pub use result::{
    ErrorData, ImportErrorEntry, ImportResult, ImportSummary, RowMarker, DATABASE_INSERT_MARKER,
    MAX_RESPONSE_ERRORS,
};
pub use row::{parse_number, validate_row, RawRow, RowRejection, RowValidation};
