use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("unsupported strategy for runner '{runner}': {strategy}")]
    UnsupportedStrategy {
        runner: &'static str,
        strategy: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("runner '{runner}' failed to launch task: {reason}")]
    Launch { runner: &'static str, reason: String },

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RunnerError {
    fn from(e: std::io::Error) -> Self {
        RunnerError::Io(e.to_string())
    }
}
