use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("unsupported strategy: expected {expected}, got {actual}")]
    UnsupportedStrategy {
        expected: &'static str,
        actual: String,
    },

    #[error("invalid runner configuration: {0}")]
    InvalidRunnerConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExecError> for simbatch_core::runner::RunnerError {
    fn from(e: ExecError) -> Self {
        use simbatch_core::runner::RunnerError;
        match e {
            ExecError::UnsupportedStrategy { expected, actual } => RunnerError::UnsupportedStrategy {
                runner: expected,
                strategy: actual,
            },
            ExecError::InvalidRunnerConfig(msg) => RunnerError::InvalidConfig(msg),
            ExecError::Io(e) => RunnerError::Io(e.to_string()),
        }
    }
}
