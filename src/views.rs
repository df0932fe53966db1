// src/views.rs

//! View-models for the HTML pages. Each struct is the full set of named
//! values its template receives.

use askama::Template;
use askama_web::WebTemplate;

use crate::{
    models::question::PublicQuestion,
    utils::{flash::FlashMessage, session::SessionUser},
};

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub viewer: Option<SessionUser>,
    pub flash: Option<FlashMessage>,
    pub highest_score: Option<i64>,
    pub user_highest: Option<i64>,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub viewer: Option<SessionUser>,
    pub flash: Option<FlashMessage>,
    /// Echoed back into the form after a failed attempt.
    pub username: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub viewer: Option<SessionUser>,
    pub flash: Option<FlashMessage>,
    pub username: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "quiz.html")]
pub struct QuizPage {
    pub viewer: Option<SessionUser>,
    pub flash: Option<FlashMessage>,
    pub questions: Vec<PublicQuestion>,
    pub highest_score: Option<i64>,
    pub user_highest: Option<i64>,
}

#[derive(Template, WebTemplate)]
#[template(path = "results.html")]
pub struct ResultsPage {
    pub viewer: Option<SessionUser>,
    pub flash: Option<FlashMessage>,
    pub score: i64,
    pub total: i64,
    pub user_highest: i64,
}
