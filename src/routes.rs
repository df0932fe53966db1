// src/routes.rs

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{admin, auth, home, quiz},
    state::AppState,
};

/// Assembles the application router.
///
/// * Page routes for the leaderboard, auth forms and the quiz.
/// * `/initialize_db` for idempotent schema + seed setup.
/// * Request tracing applied globally.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout));

    let quiz_routes = Router::new()
        .route("/quiz", get(quiz::quiz_page))
        .route("/submit_quiz", post(quiz::submit_quiz));

    Router::new()
        .route("/", get(home::index))
        .route("/initialize_db", get(admin::initialize_db))
        .merge(auth_routes)
        .merge(quiz_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
