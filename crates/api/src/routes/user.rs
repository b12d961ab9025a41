//! Route definitions for the `/user` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST /login    -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(user::login))
}
