use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Malformed row: column `{column}` {reason}")]
    MalformedRow { column: &'static str, reason: String },

    #[error("Answer {0} no longer exists in the store")]
    AnswerMissing(i64),

    #[error("Answer {answer_id} not found in poll {poll_id}")]
    AnswerNotFound { poll_id: i64, answer_id: i64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}
