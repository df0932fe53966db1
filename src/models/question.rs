// src/models/question.rs

use sqlx::prelude::FromRow;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// One of "a", "b", "c" or "d". Enforced by a CHECK constraint.
    pub correct_answer: String,

    pub topic: String,
}

/// A single answer choice as shown on the quiz page.
#[derive(Debug, Clone)]
pub struct AnswerOption {
    pub letter: &'static str,
    pub text: String,
}

/// Question as sent to the quiz page (excludes the correct answer).
#[derive(Debug, Clone)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub topic: String,
    pub options: Vec<AnswerOption>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        let options = vec![
            AnswerOption { letter: "a", text: q.option_a },
            AnswerOption { letter: "b", text: q.option_b },
            AnswerOption { letter: "c", text: q.option_c },
            AnswerOption { letter: "d", text: q.option_d },
        ];

        Self {
            id: q.id,
            question_text: q.question_text,
            topic: q.topic,
            options,
        }
    }
}

/// A built-in question inserted when the table is empty.
#[derive(Debug, Clone, Copy)]
pub struct SeedQuestion {
    pub question_text: &'static str,
    pub option_a: &'static str,
    pub option_b: &'static str,
    pub option_c: &'static str,
    pub option_d: &'static str,
    pub correct_answer: &'static str,
    pub topic: &'static str,
}
