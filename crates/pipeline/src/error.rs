/// Failures that abort an import before a result can be reported.
///
/// Row-level problems never surface here; they are recorded in the
/// [`carbase_core::car_import::ImportResult`] instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The upload could not be parsed as CSV (bad quoting, invalid UTF-8).
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv_async::Error),

    /// Reading the upload or writing the log failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
