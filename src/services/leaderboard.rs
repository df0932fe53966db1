// src/services/leaderboard.rs

use sqlx::SqlitePool;

use crate::error::AppError;

/// The figures shown on the index and quiz pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub highest_score: Option<i64>,
    pub user_highest: Option<i64>,
}

/// Highest score across all users, `None` before the first submission.
pub async fn global_high(pool: &SqlitePool) -> Result<Option<i64>, AppError> {
    let high = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(score) FROM scores")
        .fetch_one(pool)
        .await?;

    Ok(high)
}

/// Highest score of one user, `None` if they have not submitted yet.
pub async fn user_high(pool: &SqlitePool, user_id: i64) -> Result<Option<i64>, AppError> {
    let high =
        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(score) FROM scores WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(high)
}

/// Computes both figures for the current viewer. Anonymous viewers get no
/// personal best.
pub async fn for_viewer(pool: &SqlitePool, user_id: Option<i64>) -> Result<Leaderboard, AppError> {
    let highest_score = global_high(pool).await?;
    let user_highest = match user_id {
        Some(id) => user_high(pool, id).await?,
        None => None,
    };

    Ok(Leaderboard {
        highest_score,
        user_highest,
    })
}
