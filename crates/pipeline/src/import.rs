//! End-to-end CSV import: scan, insert, report.

use std::path::{Path, PathBuf};

use carbase_core::car_import::{log_file_name, render_import_log, ImportResult};
use carbase_core::types::Timestamp;
use carbase_db::store::CarStore;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::PipelineError;
use crate::scan::{scan_rows, PendingRecords};

/// What a finished import hands back to the caller.
#[derive(Debug)]
pub struct ImportOutcome {
    pub result: ImportResult,
    /// Bare file name of the report inside the logs directory.
    pub log_file: String,
}

/// Import the uploaded CSV at `csv_path` into `store`.
///
/// The upload is deleted once it has been read, whether or not reading
/// succeeded. Valid records are inserted sequentially; a record the store
/// refuses is demoted to an error entry instead of aborting the import.
/// The report is written to `log_dir`, which is created on demand.
pub async fn import_csv_file(
    store: &dyn CarStore,
    csv_path: &Path,
    log_dir: &Path,
) -> Result<ImportOutcome, PipelineError> {
    let scanned = scan_rows(csv_path).await;
    remove_upload(csv_path).await;
    let (mut result, pending) = scanned?;

    insert_pending(store, &mut result, pending).await;

    let finished_at = Utc::now();
    let log_file = log_file_name(finished_at);
    let log_path = write_log(log_dir, &log_file, &result, finished_at).await?;

    tracing::info!(
        total = result.total_rows(),
        valid = result.valid_rows(),
        invalid = result.invalid_rows(),
        inserted = result.inserted_rows(),
        log = %log_path.display(),
        "CSV import completed",
    );

    Ok(ImportOutcome { result, log_file })
}

/// Insert queued records one at a time, in file order.
pub async fn insert_pending(
    store: &dyn CarStore,
    result: &mut ImportResult,
    pending: PendingRecords,
) {
    for record in pending {
        match store.create(&record).await {
            Ok(car) => {
                tracing::debug!(car_id = car.id, "Imported car");
                result.record_inserted();
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    make = %record.make_name,
                    model = %record.model_name,
                    "Car insert refused",
                );
                result.demote(record, e.to_string());
            }
        }
    }
}

/// Render and persist the report for `result` as `file_name` inside
/// `log_dir`, returning its full path. Fails rather than replacing an
/// existing report.
pub async fn write_log(
    log_dir: &Path,
    file_name: &str,
    result: &ImportResult,
    at: Timestamp,
) -> Result<PathBuf, PipelineError> {
    tokio::fs::create_dir_all(log_dir).await?;
    let path = log_dir.join(file_name);
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await?;
    file.write_all(render_import_log(result, at).as_bytes()).await?;
    file.flush().await?;
    Ok(path)
}

async fn remove_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to remove uploaded CSV");
    }
}
