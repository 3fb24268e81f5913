use thiserror::Error;

use crate::engine::timer::TimerError;

pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// The question dataset parsed but violates a bank invariant.
    #[error("invalid question data in category '{category}': {reason}")]
    DataFormat { category: String, reason: String },

    /// The question dataset could not be read or is not valid JSON.
    #[error("failed to load question data: {0}")]
    DataLoad(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("no questions available in category: {0}")]
    NoQuestionsAvailable(String),

    #[error("question number {0} is outside 1..=10")]
    InvalidQuestionNumber(u32),

    #[error(transparent)]
    Timer(#[from] TimerError),
}

impl QuizError {
    pub(crate) fn format(category: &str, reason: impl Into<String>) -> Self {
        QuizError::DataFormat {
            category: category.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors that block the game from starting at all.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, QuizError::DataFormat { .. } | QuizError::DataLoad(_))
    }
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        QuizError::DataLoad(err.to_string())
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::DataLoad(err.to_string())
    }
}
