//! Thread strategy: one named OS thread per task.
mod runner;
pub use runner::ThreadRunner;
