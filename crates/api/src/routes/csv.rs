//! Route definitions for the `/csv` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::csv_import;
use crate::state::AppState;

/// Report download, mounted at `/csv` with the rest of the API.
///
/// ```text
/// GET  /logs/{filename}    -> download_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/logs/{filename}", get(csv_import::download_log))
}

/// The import route, mounted at `/csv` outside the request timeout.
///
/// ```text
/// POST /import             -> import
/// ```
///
/// Axum's default body limit is lifted here; the handler enforces the
/// configured upload cap while streaming.
pub fn import_router() -> Router<AppState> {
    Router::new().route(
        "/import",
        post(csv_import::import).layer(DefaultBodyLimit::disable()),
    )
}
