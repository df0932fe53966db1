// tests/api_tests.rs

use quiz_server::{config::Config, db, routes, state::AppState};
use reqwest::{Client, StatusCode, redirect::Policy};
use sqlx::SqlitePool;

struct TestApp {
    address: String,
    pool: SqlitePool,
}

/// Spawns the app on a random port against a fresh in-memory store.
///
/// `seed` controls whether the default questions are inserted up front.
async fn spawn_app(seed: bool) -> TestApp {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory SQLite");

    if seed {
        db::initialize(&pool).await.expect("Failed to initialize database");
    } else {
        db::migrate(&pool).await.expect("Failed to migrate database");
    }

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        session_secret: "test_secret_for_integration_tests".to_string(),
        session_ttl_seconds: 600,
        cookie_secure: false,
        bind_addr: "127.0.0.1:0".to_string(),
        rust_log: "error".to_string(),
    };

    let state = AppState::new(pool.clone(), config);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, pool }
}

/// Browser-like client: keeps cookies, does not follow redirects.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

fn unique_name() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn register(app: &TestApp, client: &Client, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/register", app.address))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Failed to execute request")
}

async fn login(app: &TestApp, client: &Client, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/login", app.address))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Failed to execute request")
}

async fn get(app: &TestApp, client: &Client, path: &str) -> reqwest::Response {
    client
        .get(format!("{}{}", app.address, path))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn question_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn score_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM scores")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app(true).await;

    let response = get(&app, &client(), "/random_path_that_does_not_exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_index_shows_leaderboard_only() {
    let app = spawn_app(true).await;

    let response = get(&app, &client(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("No scores yet"));
    assert!(!body.contains("Your best"));
}

#[tokio::test]
async fn register_then_login_works() {
    let app = spawn_app(true).await;
    let client = client();
    let username = unique_name();

    let response = register(&app, &client, &username, "password123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let page = get(&app, &client, "/login").await.text().await.unwrap();
    assert!(page.contains("Registration successful! Please log in."));

    let response = login(&app, &client, &username, "password123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let page = get(&app, &client, "/").await.text().await.unwrap();
    assert!(page.contains("Logged in successfully!"));
    assert!(page.contains(&username));

    // The notice is shown once.
    let page = get(&app, &client, "/").await.text().await.unwrap();
    assert!(!page.contains("Logged in successfully!"));
}

#[tokio::test]
async fn duplicate_registration_redisplays_form() {
    let app = spawn_app(true).await;
    let client = client();
    let username = unique_name();

    register(&app, &client, &username, "password123").await;
    let response = register(&app, &client, &username, "other-password").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("This username is already taken"));
    assert!(body.contains("action=\"/register\""));

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(&username)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn bad_login_redisplays_form() {
    let app = spawn_app(true).await;
    let client = client();
    let username = unique_name();
    register(&app, &client, &username, "password123").await;

    let response = login(&app, &client, &username, "wrong").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid username or password"));

    let response = login(&app, &client, "nobody_here", "password123").await;
    assert!(response.text().await.unwrap().contains("Invalid username or password"));

    // Still anonymous.
    let response = get(&app, &client, "/quiz").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn anonymous_quiz_redirects_without_seeding() {
    let app = spawn_app(false).await;
    let client = client();

    let response = get(&app, &client, "/quiz").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(question_count(&app.pool).await, 0);

    let page = get(&app, &client, "/login").await.text().await.unwrap();
    assert!(page.contains("Please log in to start the quiz"));
}

#[tokio::test]
async fn anonymous_submit_redirects_without_recording() {
    let app = spawn_app(true).await;
    let client = client();

    let response = client
        .post(format!("{}/submit_quiz", app.address))
        .form(&[("question_1", "b")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    assert_eq!(score_count(&app.pool).await, 0);
}

#[tokio::test]
async fn bodyless_submit_is_gated_then_scored_as_empty() {
    let app = spawn_app(true).await;
    let client = client();

    // No body and no content type: the session check still comes first.
    let response = client
        .post(format!("{}/submit_quiz", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(score_count(&app.pool).await, 0);

    let username = unique_name();
    register(&app, &client, &username, "password123").await;
    login(&app, &client, &username, "password123").await;

    let response = client
        .post(format!("{}/submit_quiz", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("You scored 0 out of 5."));
    assert_eq!(score_count(&app.pool).await, 1);
}

#[tokio::test]
async fn perfect_quiz_flow() {
    let app = spawn_app(true).await;
    let client = client();
    register(&app, &client, "alice", "wonderland").await;
    login(&app, &client, "alice", "wonderland").await;

    let response = get(&app, &client, "/quiz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    for id in 1..=5 {
        assert!(body.contains(&format!("name=\"question_{}\"", id)));
    }

    let response = client
        .post(format!("{}/submit_quiz", app.address))
        .form(&[
            ("question_1", "b"),
            ("question_2", "c"),
            ("question_3", "d"),
            ("question_4", "a"),
            ("question_5", "c"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("You scored 5 out of 5."));
    assert!(body.contains("Your best: 5"));

    let stored: Vec<(i64, String)> = sqlx::query_as(
        "SELECT s.score, u.username FROM scores s JOIN users u ON s.user_id = u.id",
    )
    .fetch_all(&app.pool)
    .await
    .unwrap();
    assert_eq!(stored, vec![(5, "alice".to_string())]);

    let page = get(&app, &client, "/").await.text().await.unwrap();
    assert!(page.contains("<p class=\"highest-score\">5</p>"));
    assert!(page.contains("<p class=\"user-highest\">5</p>"));
}

#[tokio::test]
async fn partial_and_malformed_answers_score_what_matches() {
    let app = spawn_app(true).await;
    let client = client();
    let username = unique_name();
    register(&app, &client, &username, "password123").await;
    login(&app, &client, &username, "password123").await;

    let response = client
        .post(format!("{}/submit_quiz", app.address))
        .form(&[
            ("question_1", "b"),
            ("question_2", "z"),
            ("question_abc", "c"),
            ("question_99", "a"),
        ])
        .send()
        .await
        .unwrap();

    let body = response.text().await.unwrap();
    assert!(body.contains("You scored 1 out of 5."));
}

#[tokio::test]
async fn user_best_is_per_user() {
    let app = spawn_app(true).await;

    let strong = client();
    let strong_name = unique_name();
    register(&app, &strong, &strong_name, "password123").await;
    login(&app, &strong, &strong_name, "password123").await;
    strong
        .post(format!("{}/submit_quiz", app.address))
        .form(&[("question_1", "b"), ("question_2", "c"), ("question_3", "d")])
        .send()
        .await
        .unwrap();

    let weak = client();
    let weak_name = unique_name();
    register(&app, &weak, &weak_name, "password123").await;
    login(&app, &weak, &weak_name, "password123").await;
    let body = weak
        .post(format!("{}/submit_quiz", app.address))
        .form(&[("question_1", "b")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Your best: 1"));

    let page = get(&app, &weak, "/").await.text().await.unwrap();
    assert!(page.contains("<p class=\"highest-score\">3</p>"));
    assert!(page.contains("<p class=\"user-highest\">1</p>"));
}

#[tokio::test]
async fn logout_ends_session_and_is_idempotent() {
    let app = spawn_app(true).await;
    let client = client();
    let username = unique_name();
    register(&app, &client, &username, "password123").await;
    login(&app, &client, &username, "password123").await;

    assert_eq!(get(&app, &client, "/quiz").await.status(), StatusCode::OK);

    let response = get(&app, &client, "/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let page = get(&app, &client, "/").await.text().await.unwrap();
    assert!(page.contains("You have been logged out"));

    let response = get(&app, &client, "/quiz").await;
    assert_eq!(location(&response), "/login");

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(sessions, 0);

    // A second logout with no session is fine.
    let response = get(&app, &client, "/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn second_login_replaces_session() {
    let app = spawn_app(true).await;
    let client = client();
    let username = unique_name();
    register(&app, &client, &username, "password123").await;

    for _ in 0..2 {
        let response = login(&app, &client, &username, "password123").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(sessions, 1);

    assert_eq!(get(&app, &client, "/quiz").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn initialize_db_is_idempotent() {
    let app = spawn_app(false).await;
    let client = client();

    for _ in 0..2 {
        let response = get(&app, &client, "/initialize_db").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    assert_eq!(question_count(&app.pool).await, 5);
}

#[tokio::test]
async fn authenticated_quiz_seeds_empty_table_once() {
    let app = spawn_app(false).await;
    let client = client();
    let username = unique_name();
    register(&app, &client, &username, "password123").await;
    login(&app, &client, &username, "password123").await;

    get(&app, &client, "/quiz").await;
    get(&app, &client, "/quiz").await;

    assert_eq!(question_count(&app.pool).await, 5);
}
