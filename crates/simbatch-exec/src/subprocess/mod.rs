//! Process strategy: one child process per task.
//!
//! Each task spawns the configured program via `tokio::process::Command` with
//! `<category> <count>` appended to its leading arguments.
mod config;
pub use config::SubprocessConfig;

mod logger;
pub use logger::LogConfig;

mod runner;
pub use runner::ProcessRunner;
