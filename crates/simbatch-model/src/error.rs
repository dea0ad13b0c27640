use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("expected at least {expected} arguments (category, count), got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("{field} must be an integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("category out of range: {0} (expected 1..=4)")]
    CategoryOutOfRange(i64),

    #[error("count must be greater than zero, got {0}")]
    NonPositiveCount(i64),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
