//! Route definitions for the `/car` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::car;
use crate::state::AppState;

/// Routes mounted at `/car`. Every handler requires a bearer token.
///
/// ```text
/// POST   /          -> create
/// GET    /all       -> list
/// GET    /search    -> search
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(car::create))
        .route("/all", get(car::list))
        .route("/search", get(car::search))
        .route(
            "/{id}",
            get(car::get_by_id).put(car::update).delete(car::delete),
        )
}
