// src/config.rs

use std::{env, fmt};

use dotenvy::dotenv;

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Lifetime of a flash notice cookie.
pub const FLASH_TTL_SECONDS: u64 = 5 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_seconds: u64,
    pub cookie_secure: bool,
    pub bind_addr: String,
    pub rust_log: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has invalid value '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quiz.db".to_string());

        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.is_empty() {
            return Err(ConfigError::Missing("SESSION_SECRET"));
        }

        let session_ttl_seconds = match env::var("SESSION_TTL_SECONDS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "SESSION_TTL_SECONDS",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_SESSION_TTL_SECONDS,
        };

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "COOKIE_SECURE",
                value: raw,
            })?,
            Err(_) => false,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            session_secret,
            session_ttl_seconds,
            cookie_secure,
            bind_addr,
            rust_log,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
