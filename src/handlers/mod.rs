// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod home;
pub mod quiz;

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    config::Config,
    error::AppError,
    utils::flash::{FlashLevel, FlashMessage, set_flash},
};

/// Redirects to `to`, carrying a notice for the next rendered page.
pub(crate) fn redirect_with_flash(
    jar: CookieJar,
    config: &Config,
    to: &str,
    level: FlashLevel,
    message: &str,
) -> Result<Response, AppError> {
    let jar = set_flash(jar, &config.session_secret, FlashMessage::new(level, message))?;
    Ok((jar, Redirect::to(to)).into_response())
}
