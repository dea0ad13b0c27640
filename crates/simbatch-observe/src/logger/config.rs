use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerOutput, LoggerTimeZone};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"simbatch_core=debug,info"`).
    pub level: LoggerLevel,
    /// Timezone of log timestamps.
    pub tz: LoggerTimeZone,
    /// Stream the text/json formats write to.
    pub output: LoggerOutput,
    /// Include module targets in output.
    pub with_targets: bool,
    /// Colored output (text format on a terminal only).
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            output: LoggerOutput::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Whether ANSI colors should be emitted.
    ///
    /// True only when `use_color` is set and the configured output stream is a terminal.
    /// Evaluate at initialization time, not while parsing config.
    pub fn should_use_color(&self) -> bool {
        self.use_color && self.output.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LoggerConfig::default();

        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.output, LoggerOutput::Stderr);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
        assert!(config.use_color);
    }

    #[test]
    fn serde_uses_defaults_for_missing_fields() {
        let config: LoggerConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.level.as_str(), "info");
        assert_eq!(config.format, LoggerFormat::default());
        assert_eq!(config.output, LoggerOutput::default());
    }

    #[test]
    fn partial_deserialization() {
        let json = r#"{"format": "json", "level": "debug", "tz": "local", "output": "stdout"}"#;
        let config: LoggerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "debug");
        assert_eq!(config.tz, LoggerTimeZone::Local);
        assert_eq!(config.output, LoggerOutput::Stdout);
        assert!(config.with_targets);
    }

    #[test]
    fn color_disabled_when_not_requested() {
        let config = LoggerConfig {
            use_color: false,
            ..Default::default()
        };
        assert!(!config.should_use_color());
    }
}
