pub mod format;
pub use format::LoggerFormat;

pub mod level;
pub use level::LoggerLevel;

pub mod output;
pub use output::LoggerOutput;

pub mod rfc3339;
pub use rfc3339::LoggerRfc3339;

pub mod timezone;
pub use timezone::{LoggerTimeZone, init_local_offset, local_offset};
