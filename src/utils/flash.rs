// src/utils/flash.rs

//! One-shot notices carried across a redirect.
//!
//! The notice lives in a `flash` cookie as an HS256 token signed with the
//! session secret, so a client cannot forge messages into the page. The next
//! rendered page takes it and clears the cookie.

use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::FLASH_TTL_SECONDS, error::AppError};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
    Warning,
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
            FlashLevel::Info => "info",
            FlashLevel::Warning => "warning",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    level: FlashLevel,
    message: String,
    exp: usize,
}

/// Signs `flash` and stores it in the jar, replacing any pending notice.
pub fn set_flash(jar: CookieJar, secret: &str, flash: FlashMessage) -> Result<CookieJar, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .as_secs();

    let claims = FlashClaims {
        level: flash.level,
        message: flash.message,
        exp: (now + FLASH_TTL_SECONDS) as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let cookie = Cookie::build((FLASH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok(jar.add(cookie))
}

/// Removes the pending notice from the jar and returns it if it verifies.
/// Expired or tampered cookies are dropped silently.
pub fn take_flash(jar: CookieJar, secret: &str) -> (CookieJar, Option<FlashMessage>) {
    let Some(token) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };

    let flash = decode::<FlashClaims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| FlashMessage {
        level: data.claims.level,
        message: data.claims.message,
    })
    .map_err(|e| tracing::debug!("Discarding unreadable flash cookie: {}", e))
    .ok();

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}
