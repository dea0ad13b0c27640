/// Simulated work performed between the start and end timestamps of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkProfile {
    /// Record `end` immediately after `start`.
    Immediate,
    /// Block for a uniformly drawn interval in `[0, max_ms)` milliseconds.
    Sleep { max_ms: u64 },
}

