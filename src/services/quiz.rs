// src/services/quiz.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    models::{
        question::{Question, SeedQuestion},
        score::{QuizOutcome, Score},
    },
    services::leaderboard,
};

/// Form field prefix for a question's chosen letter: `question_<id>`.
pub const ANSWER_FIELD_PREFIX: &str = "question_";

/// Default question set, inserted in this order when the table is empty.
pub const SEED_QUESTIONS: [SeedQuestion; 5] = [
    SeedQuestion {
        question_text: "Which library is the primary choice for building Discord bots in Python?",
        option_a: "discordpy",
        option_b: "discord.py",
        option_c: "pydiscord",
        option_d: "botpy",
        correct_answer: "b",
        topic: "Chatbot automation with Python",
    },
    SeedQuestion {
        question_text: "Which decorator binds a function to a URL in Flask?",
        option_a: "@app.url()",
        option_b: "@app.link()",
        option_c: "@app.route()",
        option_d: "@app.path()",
        correct_answer: "c",
        topic: "Web development with Python",
    },
    SeedQuestion {
        question_text: "Which of the following is NOT a Python library for AI development?",
        option_a: "TensorFlow",
        option_b: "PyTorch",
        option_c: "Scikit-learn",
        option_d: "PyAI",
        correct_answer: "d",
        topic: "Artificial intelligence development with Python",
    },
    SeedQuestion {
        question_text: "Which TensorFlow function is commonly used for image preprocessing?",
        option_a: "tf.image.resize()",
        option_b: "tf.image.process()",
        option_c: "tf.preprocess_image()",
        option_d: "tf.cv.resize()",
        correct_answer: "a",
        topic: "Computer Vision",
    },
    SeedQuestion {
        question_text: "In the context of Python libraries, what does NLTK stand for?",
        option_a: "Natural Language Tool Kit",
        option_b: "Natural Language Testing Kit",
        option_c: "Natural Language Toolkit",
        option_d: "Natural Language Training Kit",
        correct_answer: "c",
        topic: "Natural Language Processing",
    },
];

/// Inserts the seed set if, and only if, the questions table is empty.
///
/// The emptiness check and the insert are one statement, so two concurrent
/// initializers cannot both seed. Returns the number of rows inserted.
pub async fn seed_questions(pool: &SqlitePool) -> Result<u64, AppError> {
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "INSERT INTO questions
            (question_text, option_a, option_b, option_c, option_d, correct_answer, topic)
        SELECT * FROM (",
    );

    query_builder.push_values(SEED_QUESTIONS.iter(), |mut row, q| {
        row.push_bind(q.question_text)
            .push_bind(q.option_a)
            .push_bind(q.option_b)
            .push_bind(q.option_c)
            .push_bind(q.option_d)
            .push_bind(q.correct_answer)
            .push_bind(q.topic);
    });
    query_builder.push(") WHERE NOT EXISTS (SELECT 1 FROM questions)");

    let result = query_builder.build().execute(pool).await.map_err(|e| {
        tracing::error!("Failed to seed questions: {:?}", e);
        AppError::from(e)
    })?;

    Ok(result.rows_affected())
}

/// All questions, in id order, without seeding.
pub async fn list_questions(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question_text, option_a, option_b, option_c, option_d, correct_answer, topic
        FROM questions
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// The active question set. Seeds the default set first if the table is
/// empty, so repeated calls return the same rows.
pub async fn get_questions(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    let inserted = seed_questions(pool).await?;
    if inserted > 0 {
        tracing::info!("Question table was empty, seeded {} questions", inserted);
    }

    list_questions(pool).await
}

/// Counts exact matches between submitted letters and correct answers.
///
/// Missing, unknown or malformed entries simply score nothing, so the result
/// is always within `0..=questions.len()`.
pub fn score_submission(questions: &[Question], answers: &HashMap<i64, String>) -> i64 {
    questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|a| *a == q.correct_answer))
        .count() as i64
}

/// Pulls `question_<id>` fields out of a submitted form.
/// Fields that don't follow the pattern are ignored.
pub fn parse_answers(form: &HashMap<String, String>) -> HashMap<i64, String> {
    form.iter()
        .filter_map(|(field, value)| {
            let id = field.strip_prefix(ANSWER_FIELD_PREFIX)?.parse::<i64>().ok()?;
            Some((id, value.clone()))
        })
        .collect()
}

/// Scores a submission against the full current question set and records
/// exactly one score row for `user_id`.
pub async fn submit_quiz(
    pool: &SqlitePool,
    user_id: i64,
    answers: &HashMap<i64, String>,
) -> Result<QuizOutcome, AppError> {
    let questions = list_questions(pool).await?;
    let score = score_submission(&questions, answers);
    let total = questions.len() as i64;

    let recorded = sqlx::query_as::<_, Score>(
        r#"
        INSERT INTO scores (score, created_at, user_id)
        VALUES (?, ?, ?)
        RETURNING id, score, created_at, user_id
        "#,
    )
    .bind(score)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record score: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        score_id = recorded.id,
        user_id = recorded.user_id,
        score = recorded.score,
        total,
        "Quiz submission recorded"
    );

    let user_highest = leaderboard::user_high(pool, user_id).await?.unwrap_or(score);

    Ok(QuizOutcome {
        score,
        total,
        user_highest,
    })
}
