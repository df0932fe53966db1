// src/models/score.rs

use sqlx::FromRow;

/// Represents the 'scores' table in the database.
/// One row per completed quiz submission; never updated afterwards.
#[derive(Debug, Clone, FromRow)]
pub struct Score {
    pub id: i64,
    pub score: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user_id: i64,
}

/// Outcome of a quiz submission, as shown on the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: i64,
    pub total: i64,
    pub user_highest: i64,
}
