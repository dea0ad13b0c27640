use tracing::{debug, info};

/// How extra child stdout lines are forwarded to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Max line length before truncation.
    pub max_line_length: usize,
    /// Log at INFO level (false = DEBUG).
    pub stdout_info: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            stdout_info: false,
        }
    }
}

impl LogConfig {
    pub(crate) fn forward(&self, run_id: &str, line: &str) {
        let line = truncate(line, self.max_line_length);
        if self.stdout_info {
            info!(task = run_id, "{line}");
        } else {
            debug!(task = run_id, "{line}");
        }
    }
}

/// Cut `line` to at most `max` bytes on a char boundary.
fn truncate(line: &str, max: usize) -> &str {
    if line.len() <= max {
        return line;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}
