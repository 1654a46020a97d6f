use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// Shared application state available to all request handlers.
///
/// Cloned per-request by axum; both fields are cheap to clone
/// (`PgPool` is an `Arc` internally).
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// Server configuration loaded at startup.
    pub config: Arc<ServerConfig>,
}
