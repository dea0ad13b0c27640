mod config;
mod error;
mod logger;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerOutput, LoggerRfc3339};
pub use object::{LoggerTimeZone, init_local_offset, local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// All `tracing` macros in the workspace go through it afterwards. Fails with
/// [`LoggerError::AlreadyInitialized`] on a second call.
///
/// With `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before any
/// thread (or tokio runtime) exists.
///
/// # Examples
/// ```rust
/// use simbatch_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger init");
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => logger::logger_text(cfg),
        LoggerFormat::Json => logger::logger_json(cfg),
        LoggerFormat::Journald => logger::logger_journald(cfg),
    }
}
