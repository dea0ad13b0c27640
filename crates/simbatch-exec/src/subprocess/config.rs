use std::{fmt, path::PathBuf};

use tracing::trace;

use crate::{ExecError, subprocess::LogConfig};

/// Child program settings shared by every task of the process strategy.
#[derive(Debug, Clone)]
pub struct SubprocessConfig {
    /// Executable to launch.
    pub(crate) program: PathBuf,
    /// Arguments placed before `<category> <count>`.
    pub(crate) leading_args: Vec<String>,
    /// Whether a non-zero exit is a task failure.
    pub(crate) fail_on_non_zero: bool,
    /// Forwarding of extra stdout lines.
    pub(crate) log: LogConfig,
}

impl SubprocessConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            fail_on_non_zero: true,
            log: LogConfig::default(),
        }
    }

    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fail_on_non_zero(mut self, enabled: bool) -> Self {
        self.fail_on_non_zero = enabled;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Rules:
    /// - `program` is not empty;
    /// - `log.max_line_length` is positive.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.as_os_str().is_empty() {
            return Err(ExecError::InvalidRunnerConfig("child program is empty".into()));
        }
        if self.log.max_line_length == 0 {
            return Err(ExecError::InvalidRunnerConfig(
                "max_line_length must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn trace_state(&self, run_id: &str, args: &[String]) {
        trace!(
            task = run_id,
            program = %self.program.display(),
            leading_args = ?self.leading_args,
            args = ?args,
            fail_on_non_zero = self.fail_on_non_zero,
            "child command resolved"
        );
    }
}

impl fmt::Display for SubprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SubprocessConfig(program='{}', leading_args={}, fail_on_non_zero={})",
            self.program.display(),
            self.leading_args.len(),
            self.fail_on_non_zero,
        )
    }
}
