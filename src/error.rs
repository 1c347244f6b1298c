use crate::persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// A calendar row could not be read as a date. Never coerced.
    #[error("could not parse date '{value}' in calendar row {row}")]
    Parse { row: usize, value: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no preloaded curriculum found for {subject} ({grade})")]
    LookupMiss { subject: String, grade: String },
    #[error("no lessons stored for class '{0}'")]
    UnknownClass(String),
    #[error("lesson index {index} is out of range for class '{class_key}' ({len} lessons)")]
    LessonIndexOutOfRange {
        class_key: String,
        index: usize,
        len: usize,
    },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl PlannerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlannerError::InvalidInput(message.into())
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
