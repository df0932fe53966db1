// src/state.rs

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::Config;

/// Shared by every handler. Handlers extract `State<SqlitePool>` and
/// `State<Config>` directly through the derived `FromRef` projections.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self { pool, config }
    }
}
