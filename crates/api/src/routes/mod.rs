pub mod car;
pub mod csv;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /user/login                 login (public)
///
/// /car                        create (requires auth)
/// /car/all                    paginated list
/// /car/search                 free-text search
/// /car/{id}                   get, update, delete
///
/// /csv/logs/{filename}        download an import report (requires auth)
/// ```
///
/// `POST /csv/import` is mounted separately by the app router so it runs
/// without a request timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/car", car::router())
        .nest("/csv", csv::router())
}
