// src/handlers/admin.rs

use axum::{extract::State, response::Redirect};
use sqlx::SqlitePool;

use crate::{db, error::AppError};

/// Creates the schema and seeds the default questions if needed.
/// Safe to hit repeatedly.
pub async fn initialize_db(State(pool): State<SqlitePool>) -> Result<Redirect, AppError> {
    db::initialize(&pool).await.map_err(|e| {
        tracing::error!("Database initialization failed: {}", e);
        e
    })?;

    Ok(Redirect::to("/"))
}
