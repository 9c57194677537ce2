use thiserror::Error;

/// Input rejected before it can become a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Coin name is required")]
    EmptyCoin,

    #[error("{metric}: score {value} is outside 1-5")]
    MetricOutOfRange { metric: &'static str, value: i64 },

    #[error("expected {expected} metric scores, got {actual}")]
    MetricCount { expected: usize, actual: usize },

    #[error("expected {expected} stage answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },

    #[error("{stage}: '{input}' is not a yes/no answer")]
    InvalidAnswer { stage: &'static str, input: String },
}
