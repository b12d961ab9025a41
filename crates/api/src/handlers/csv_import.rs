//! Handlers for the `/csv` resource: bulk import and report download.

use std::path::{Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use carbase_core::car_import::{is_safe_log_file_name, ImportErrorEntry, ImportSummary};
use carbase_pipeline::{import_csv_file, ImportOutcome};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "csvFile";

/// Declared content types accepted for an upload.
const ACCEPTED_CONTENT_TYPES: &[&str] = &["text/csv", "application/vnd.ms-excel"];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub message: &'static str,
    pub summary: ImportSummary,
    pub log_file: String,
    /// The leading error entries; the full list is in the log file.
    pub errors: Vec<ImportErrorEntry>,
}

impl From<ImportOutcome> for ImportResponse {
    fn from(outcome: ImportOutcome) -> Self {
        Self {
            success: true,
            message: "CSV import completed",
            summary: outcome.result.summary(),
            errors: outcome.result.response_errors().to_vec(),
            log_file: outcome.log_file,
        }
    }
}

// ---------------------------------------------------------------------------
// Upload handling
// ---------------------------------------------------------------------------

/// Whether an upload looks like CSV, by declared type or by file name.
pub fn is_csv_upload(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    if declared
        .as_deref()
        .is_some_and(|ct| ACCEPTED_CONTENT_TYPES.contains(&ct))
    {
        return true;
    }
    file_name
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File too large. Maximum upload size is {limit} bytes"
    ))
}

/// Find the upload field and stage it on disk. `None` when the form has
/// no upload field.
async fn stage_upload(
    multipart: &mut Multipart,
    state: &AppState,
) -> AppResult<Option<PathBuf>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if !is_csv_upload(field.content_type(), field.file_name()) {
            return Err(AppError::BadRequest("Only CSV files are allowed".into()));
        }
        let config = &state.config;
        let path = write_field(field, &config.upload_dir, config.max_upload_bytes).await?;
        return Ok(Some(path));
    }
    Ok(None)
}

/// Stream one field to `upload-<millis>-<uuid>.csv` inside `dir`, chunk by
/// chunk, enforcing `limit`. A partial file is removed on failure.
async fn write_field(mut field: Field<'_>, dir: &FsPath, limit: usize) -> AppResult<PathBuf> {
    let io_error =
        |e: std::io::Error| AppError::InternalError(format!("Upload staging failed: {e}"));

    tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
    let path = dir.join(format!(
        "upload-{}-{}.csv",
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    ));
    let mut file = tokio::fs::File::create(&path).await.map_err(io_error)?;

    let mut written = 0usize;
    let copied: AppResult<()> = async {
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            written += chunk.len();
            if written > limit {
                return Err(too_large(limit));
            }
            file.write_all(&chunk).await.map_err(io_error)?;
        }
        file.flush().await.map_err(io_error)
    }
    .await;

    if let Err(e) = copied {
        drop(file);
        if let Err(rm) = tokio::fs::remove_file(&path).await {
            tracing::warn!(error = %rm, path = %path.display(), "Failed to remove partial upload");
        }
        return Err(e);
    }

    tracing::debug!(bytes = written, path = %path.display(), "Upload staged");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/csv/import
///
/// Multipart form with a single `csvFile` field. Responds with the import
/// tallies, the report file name, and the first ten error entries. Once
/// the upload is staged the import runs to completion.
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportResponse>> {
    let upload = stage_upload(&mut multipart, &state)
        .await?
        .ok_or_else(|| AppError::BadRequest("Please upload a CSV file".into()))?;

    tracing::info!(user_id = user.user_id, path = %upload.display(), "Starting CSV import");

    // The import owns its task so a dropped request cannot stop it between
    // inserts or before the report is written.
    let cars = state.cars.clone();
    let log_dir = state.config.log_dir.clone();
    let outcome = tokio::spawn(async move {
        import_csv_file(cars.as_ref(), &upload, &log_dir).await
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Import task failed: {e}")))??;

    Ok(Json(ImportResponse::from(outcome)))
}

/// GET /api/v1/csv/logs/{filename}
///
/// Streams a previously written import report as an attachment.
pub async fn download_log(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    if !is_safe_log_file_name(&filename) {
        return Err(AppError::BadRequest("Invalid log file name".into()));
    }
    let not_found = || AppError::NotFound("Log file not found".into());

    let path = state.config.log_dir.join(&filename);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::InternalError(format!("Failed to open log: {e}"))),
    };
    let metadata = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read log metadata: {e}")))?;
    if !metadata.is_file() {
        return Err(not_found());
    }

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
        ],
        body,
    )
        .into_response())
}
