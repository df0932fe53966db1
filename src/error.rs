// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
///
/// The user-facing kinds are normally turned into flash notices by the
/// handlers before they ever reach `into_response`.
#[derive(Debug)]
pub enum AppError {
    // 409 Conflict: username already registered
    DuplicateUser(String),

    // 401 Unauthorized: unknown username or wrong password
    InvalidCredentials,

    // 400 Bad Request: form input failed validation
    Validation(String),

    // 500: store unavailable or constraint violation
    Persistence(String),

    // 500: hashing, token signing and other non-store failures
    Internal(String),
}

impl AppError {
    /// Message suitable for showing to the user in a notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DuplicateUser(_) => "This username is already taken".to_string(),
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Persistence(_) | AppError::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DuplicateUser(username) => write!(f, "username '{username}' already exists"),
            AppError::InvalidCredentials => write!(f, "invalid credentials"),
            AppError::Validation(msg) => write!(f, "validation failed: {msg}"),
            AppError::Persistence(msg) => write!(f, "persistence failure: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Persistence(msg) => {
                tracing::error!("Persistence failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::DuplicateUser(_) => (StatusCode::CONFLICT, self.user_message()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.user_message()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, message).into_response()
    }
}

/// Allows using `?` on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Persistence(err.to_string())
    }
}
