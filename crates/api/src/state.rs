use std::sync::Arc;

use carbase_db::store::CarStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything heavy sits behind an `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (credentials, health checks).
    pub pool: carbase_db::DbPool,
    /// Record store for cars. Handlers and the import pipeline go through
    /// this rather than the pool.
    pub cars: Arc<dyn CarStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
