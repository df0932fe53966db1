// src/handlers/home.rs

use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    services::leaderboard,
    utils::{flash::take_flash, session::RequestContext},
    views::IndexPage,
};

/// Leaderboard page.
///
/// Shows the global highest score to everyone and the viewer's own best
/// when logged in.
pub async fn index(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let board = leaderboard::for_viewer(&pool, ctx.user_id()).await?;
    let (jar, flash) = take_flash(jar, &config.session_secret);

    Ok((
        jar,
        IndexPage {
            viewer: ctx.user,
            flash,
            highest_score: board.highest_score,
            user_highest: board.user_highest,
        },
    ))
}
