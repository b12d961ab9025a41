//! Plain-text import report written next to every CSV upload.

use uuid::Uuid;

use crate::types::Timestamp;

use super::result::{ImportErrorEntry, ImportResult};

/// Width of the `=` banners framing the report.
pub const BANNER_WIDTH: usize = 60;

/// Width of the `-` rule closing each error block.
const ENTRY_RULE_WIDTH: usize = 40;

const LOG_FILE_PREFIX: &str = "upload-log-";
const LOG_FILE_EXTENSION: &str = ".txt";

/// Render the import report for `result`.
///
/// The output depends only on its arguments, so rendering the same result
/// and timestamp twice yields identical bytes.
pub fn render_import_log(result: &ImportResult, imported_at: Timestamp) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut lines: Vec<String> = vec![
        banner.clone(),
        "CSV UPLOAD LOG".to_string(),
        banner.clone(),
        String::new(),
        format!("Import Date: {}", imported_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Total Rows Processed: {}", result.total_rows()),
        format!("Valid Rows: {}", result.valid_rows()),
        format!("Invalid Rows: {}", result.invalid_rows()),
        format!("Successfully Inserted: {}", result.inserted_rows()),
        String::new(),
    ];

    if result.errors().is_empty() {
        lines.push("No errors found. All rows imported successfully.".to_string());
    } else {
        lines.push("ERROR DETAILS:".to_string());
        lines.push("-".repeat(BANNER_WIDTH));
        lines.push(String::new());
        for (index, entry) in result.errors().iter().enumerate() {
            push_error_block(&mut lines, index + 1, entry);
        }
    }

    lines.push(banner.clone());
    lines.push("END OF LOG".to_string());
    lines.push(banner);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_error_block(lines: &mut Vec<String>, ordinal: usize, entry: &ImportErrorEntry) {
    lines.push(format!("Error {ordinal}:"));
    lines.push(format!("Row: {}", entry.row_number));
    for message in &entry.errors {
        lines.push(format!("  - {message}"));
    }
    let data = serde_json::to_string_pretty(&entry.data)
        .unwrap_or_else(|e| format!("<unserializable row data: {e}>"));
    lines.push(format!("Data: {data}"));
    lines.push("-".repeat(ENTRY_RULE_WIDTH));
    lines.push(String::new());
}

/// File name for a log written at `at`:
/// `upload-log-<unix millis>-<uuid>.txt`. Every call returns a fresh name,
/// even for the same `at`.
pub fn log_file_name(at: Timestamp) -> String {
    format!(
        "{LOG_FILE_PREFIX}{}-{}{LOG_FILE_EXTENSION}",
        at.timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// Whether `name` is safe to resolve inside the logs directory: a bare file
/// name with no separators or parent references.
pub fn is_safe_log_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
