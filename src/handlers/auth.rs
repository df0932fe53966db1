// src/handlers/auth.rs

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    handlers::redirect_with_flash,
    models::user::CredentialsForm,
    services::auth,
    utils::{
        flash::{FlashLevel, FlashMessage, take_flash},
        session::{RequestContext, end_session, start_session},
    },
    views::{LoginPage, RegisterPage},
};

pub async fn login_page(
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar, &config.session_secret);

    (
        jar,
        LoginPage {
            viewer: ctx.user,
            flash,
            username: String::new(),
        },
    )
}

/// Authenticates a user from the login form.
///
/// * On success replaces any existing session with a fresh one and
///   redirects to the leaderboard.
/// * On bad credentials redisplays the form with a notice.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match auth::login(&pool, &form).await {
        Ok(user) => {
            let jar = end_session(&pool, jar).await?;
            let jar = start_session(&pool, &config, jar, &user).await?;
            redirect_with_flash(
                jar,
                &config,
                "/",
                FlashLevel::Success,
                "Logged in successfully!",
            )
        }
        Err(err @ AppError::InvalidCredentials) => {
            let (jar, _) = take_flash(jar, &config.session_secret);
            let page = LoginPage {
                viewer: ctx.user,
                flash: Some(FlashMessage::new(FlashLevel::Danger, err.user_message())),
                username: form.username,
            };
            Ok((jar, page).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn register_page(
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar, &config.session_secret);

    (
        jar,
        RegisterPage {
            viewer: ctx.user,
            flash,
            username: String::new(),
        },
    )
}

/// Registers a user from the registration form.
///
/// Redirects to the login page on success. A taken username or invalid
/// input redisplays the form with a notice.
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    match auth::register(&pool, &form).await {
        Ok(_) => redirect_with_flash(
            jar,
            &config,
            "/login",
            FlashLevel::Success,
            "Registration successful! Please log in.",
        ),
        Err(err @ (AppError::DuplicateUser(_) | AppError::Validation(_))) => {
            let (jar, _) = take_flash(jar, &config.session_secret);
            let page = RegisterPage {
                viewer: ctx.user,
                flash: Some(FlashMessage::new(FlashLevel::Danger, err.user_message())),
                username: form.username,
            };
            Ok((jar, page).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Ends the current session, if any, and returns to the leaderboard.
pub async fn logout(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let jar = end_session(&pool, jar).await?;
    redirect_with_flash(
        jar,
        &config,
        "/",
        FlashLevel::Info,
        "You have been logged out",
    )
}
