// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    handlers::redirect_with_flash,
    models::question::PublicQuestion,
    services::{leaderboard, quiz},
    utils::{
        flash::{FlashLevel, take_flash},
        session::RequestContext,
    },
    views::{QuizPage, ResultsPage},
};

/// Renders the full question set.
///
/// * Requires a session; anonymous viewers are sent to the login page
///   before any question is read.
/// * Answers are not included in the page.
pub async fn quiz_page(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Some(user) = ctx.require_user() else {
        return redirect_with_flash(
            jar,
            &config,
            "/login",
            FlashLevel::Warning,
            "Please log in to start the quiz",
        );
    };

    let questions: Vec<PublicQuestion> = quiz::get_questions(&pool)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();
    let board = leaderboard::for_viewer(&pool, Some(user.id)).await?;
    let (jar, flash) = take_flash(jar, &config.session_secret);

    let page = QuizPage {
        viewer: ctx.user.clone(),
        flash,
        questions,
        highest_score: board.highest_score,
        user_highest: board.user_highest,
    };

    Ok((jar, page).into_response())
}

/// Scores a submission and records it.
///
/// Form fields are `question_<id>` → chosen letter. Missing or malformed
/// fields count as wrong, and a missing or unreadable body is an empty
/// submission. The session is checked before the body is looked at.
/// Every accepted submission stores one score row.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    ctx: RequestContext,
    jar: CookieJar,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(user) = ctx.require_user() else {
        return redirect_with_flash(
            jar,
            &config,
            "/login",
            FlashLevel::Warning,
            "Please log in to submit the quiz",
        );
    };

    let form = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            tracing::debug!("Treating unreadable quiz body as empty: {}", rejection);
            HashMap::new()
        }
    };

    let answers = quiz::parse_answers(&form);
    let outcome = quiz::submit_quiz(&pool, user.id, &answers).await?;
    let (jar, flash) = take_flash(jar, &config.session_secret);

    let page = ResultsPage {
        viewer: ctx.user.clone(),
        flash,
        score: outcome.score,
        total: outcome.total,
        user_highest: outcome.user_highest,
    };

    Ok((jar, page).into_response())
}
