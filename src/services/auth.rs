// src/services/auth.rs

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{CredentialsForm, User},
    utils::hash::{hash_password, verify_password},
};

/// Registers a new user.
///
/// * Validates the form and trims the username.
/// * Fails with `DuplicateUser` if the username is taken, including when a
///   concurrent registration wins the UNIQUE constraint.
/// * Stores an Argon2 hash, never the plaintext.
pub async fn register(pool: &SqlitePool, form: &CredentialsForm) -> Result<User, AppError> {
    let form = form.normalized();
    form.validate()
        .map_err(|e| AppError::Validation(validation_message(&e)))?;

    let existing = find_by_username(pool, &form.username).await?;
    if existing.is_some() {
        return Err(AppError::DuplicateUser(form.username));
    }

    let hashed_password = hash_password(&form.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, created_at)
        VALUES (?, ?, ?)
        RETURNING id, username, password, created_at
        "#,
    )
    .bind(&form.username)
    .bind(&hashed_password)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        let unique_violation = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique_violation {
            AppError::DuplicateUser(form.username.clone())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Verifies credentials. Unknown usernames and wrong passwords are
/// indistinguishable to the caller.
pub async fn login(pool: &SqlitePool, form: &CredentialsForm) -> Result<User, AppError> {
    let form = form.normalized();

    let Some(user) = find_by_username(pool, &form.username).await? else {
        tracing::info!(username = %form.username, "Login failed: unknown user");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password)? {
        tracing::info!(username = %form.username, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = user.id, "Login succeeded");
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Flattens validator output into one line of user-facing text.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|err| match &err.message {
            Some(msg) => msg.to_string(),
            None => err.code.to_string(),
        })
        .collect();
    messages.sort();
    messages.join(" ")
}
