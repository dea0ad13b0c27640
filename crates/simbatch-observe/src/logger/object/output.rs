use std::{fmt, io::IsTerminal, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::logger::LoggerError;

/// Stream the fmt layers write to.
///
/// Defaults to `Stderr` so that stdout stays free for program output (the process
/// entry point prints its artifact path there).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerOutput {
    Stdout,
    #[default]
    Stderr,
}

impl LoggerOutput {
    pub(crate) fn make_writer(&self) -> BoxMakeWriter {
        match self {
            LoggerOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
            LoggerOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            LoggerOutput::Stdout => std::io::stdout().is_terminal(),
            LoggerOutput::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

impl FromStr for LoggerOutput {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => Err(LoggerError::InvalidOutput(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerOutput::Stdout => "stdout",
            LoggerOutput::Stderr => "stderr",
        })
    }
}
