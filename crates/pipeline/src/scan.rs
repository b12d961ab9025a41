//! Streaming read of an uploaded CSV file into validated rows.

use std::path::Path;

use carbase_core::car::CreateCar;
use carbase_core::car_import::{validate_row, ImportResult, RawRow};
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};

use crate::error::PipelineError;

const UTF8_BOM: char = '\u{feff}';

/// Rows accepted by the validator, waiting to be inserted.
pub type PendingRecords = Vec<CreateCar>;

/// Read every data row of `path`, validating each as it arrives.
///
/// The first line is the header. Rows are numbered from 1 starting at the
/// first data line. Cells beyond the header width are ignored and missing
/// trailing cells count as absent columns.
pub async fn scan_rows(path: &Path) -> Result<(ImportResult, PendingRecords), PipelineError> {
    let file = tokio::fs::File::open(path).await?;
    let mut reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .create_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .await?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                // `Trim::Headers` ran before the BOM was removed, so any
                // whitespace between the BOM and the label is still here.
                h.trim_start_matches(UTF8_BOM).trim().to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut result = ImportResult::new();
    let mut pending = PendingRecords::new();
    let mut record = StringRecord::new();
    let mut row_number: u64 = 0;

    while reader.read_record(&mut record).await? {
        row_number += 1;
        let raw: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        if let Some(car) = result.record_row(validate_row(&raw, row_number)) {
            pending.push(car);
        }
    }

    tracing::debug!(
        rows = row_number,
        valid = result.valid_rows(),
        invalid = result.invalid_rows(),
        "CSV scan complete",
    );
    Ok((result, pending))
}
