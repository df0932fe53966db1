// src/db.rs

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{error::AppError, services::quiz};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the store at `database_url`, creating the file if missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Single-connection in-memory store. The connection is never recycled,
/// otherwise the database would vanish with it.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Applies pending schema migrations. Already-applied ones are skipped.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Idempotent setup: schema creation plus default question seeding.
pub async fn initialize(pool: &SqlitePool) -> Result<(), AppError> {
    tracing::info!("Running migrations...");
    migrate(pool).await?;

    let inserted = quiz::seed_questions(pool).await?;
    if inserted > 0 {
        tracing::info!("Seeded {} default questions", inserted);
    } else {
        tracing::debug!("Question table already populated, skipping seed");
    }

    Ok(())
}
