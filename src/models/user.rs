// src/models/user.rs

use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash. Never rendered.
    pub password: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Form body for both `/register` and `/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsForm {
    #[validate(length(
        min = 1,
        max = 80,
        message = "Username must be between 1 and 80 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be between 1 and 128 characters."
    ))]
    pub password: String,
}

impl CredentialsForm {
    /// Returns a copy with the username stripped of surrounding whitespace.
    pub fn normalized(&self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}
