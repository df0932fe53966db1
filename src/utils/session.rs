// src/utils/session.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{config::Config, error::AppError, models::user::User, state::AppState};

pub const SESSION_COOKIE: &str = "session_id";

/// The authenticated identity bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Per-request context handed to every handler.
///
/// Resolves the `session_id` cookie against the `sessions` table. A missing,
/// unknown or expired token yields an anonymous context.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<SessionUser>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// The logged-in user, `None` for anonymous requests. Callers redirect
    /// to the login page with their own notice.
    pub fn require_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
            return Ok(Self::anonymous());
        };

        let user = find_session_user(&state.pool, &token).await?;
        if user.is_none() {
            tracing::debug!("Session cookie did not match a live session");
        }

        Ok(Self { user })
    }
}

/// Looks up the user bound to a live (unexpired) session token.
pub async fn find_session_user(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<SessionUser>, AppError> {
    let user = sqlx::query_as::<_, SessionUser>(
        r#"
        SELECT u.id, u.username
        FROM sessions s
        JOIN users u ON s.user_id = u.id
        WHERE s.token = ? AND s.expires_at > ?
        "#,
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Creates a session row for `user` and sets the session cookie.
///
/// Expired sessions of any user are purged first.
pub async fn start_session(
    pool: &SqlitePool,
    config: &Config,
    jar: CookieJar,
    user: &User,
) -> Result<CookieJar, AppError> {
    let purged = clean_expired_sessions(pool).await?;
    if purged > 0 {
        tracing::info!("Cleaned up {} expired sessions", purged);
    }

    let token = Uuid::new_v4().to_string();
    let now = Utc::now();
    let ttl = i64::try_from(config.session_ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::Internal("session ttl out of range".to_string()))?;
    let expires_at = now + ttl;

    sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user.id)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .build();

    Ok(jar.add(cookie))
}

/// Deletes the session behind the cookie (if any) and clears the cookie.
/// Safe to call without an active session.
pub async fn end_session(pool: &SqlitePool, jar: CookieJar) -> Result<CookieJar, AppError> {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(&token)
            .execute(pool)
            .await?;
    }

    Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}

pub async fn clean_expired_sessions(pool: &SqlitePool) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, services::auth};
    use crate::models::user::CredentialsForm;

    fn test_config(ttl: u64) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            session_secret: "session-test-secret".to_string(),
            session_ttl_seconds: ttl,
            cookie_secure: false,
            bind_addr: "127.0.0.1:0".to_string(),
            rust_log: "error".to_string(),
        }
    }

    async fn registered_user(pool: &SqlitePool) -> User {
        let form = CredentialsForm {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
        };
        auth::register(pool, &form).await.unwrap()
    }

    #[tokio::test]
    async fn session_round_trip_and_logout() {
        let pool = db::connect_in_memory().await.unwrap();
        db::migrate(&pool).await.unwrap();
        let user = registered_user(&pool).await;

        let jar = start_session(&pool, &test_config(3600), CookieJar::new(), &user)
            .await
            .unwrap();
        let token = jar.get(SESSION_COOKIE).unwrap().value().to_string();

        let found = find_session_user(&pool, &token).await.unwrap();
        assert_eq!(
            found,
            Some(SessionUser {
                id: user.id,
                username: "alice".to_string()
            })
        );

        let jar = end_session(&pool, jar).await.unwrap();
        assert!(jar.get(SESSION_COOKIE).is_none());
        assert_eq!(find_session_user(&pool, &token).await.unwrap(), None);

        // Logging out twice is harmless.
        end_session(&pool, jar).await.unwrap();
    }

    #[tokio::test]
    async fn expired_session_is_not_resolved() {
        let pool = db::connect_in_memory().await.unwrap();
        db::migrate(&pool).await.unwrap();
        let user = registered_user(&pool).await;

        let jar = start_session(&pool, &test_config(0), CookieJar::new(), &user)
            .await
            .unwrap();
        let token = jar.get(SESSION_COOKIE).unwrap().value().to_string();

        assert_eq!(find_session_user(&pool, &token).await.unwrap(), None);
        assert_eq!(clean_expired_sessions(&pool).await.unwrap(), 1);
    }

    #[test]
    fn require_user_fails_for_anonymous() {
        let ctx = RequestContext::anonymous();
        assert!(ctx.require_user().is_none());
        assert_eq!(ctx.user_id(), None);
    }
}
