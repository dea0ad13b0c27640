use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence for run identifiers.
static RUN_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_seq() -> u64 {
    RUN_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Builds a run id used to correlate log lines of one task.
///
/// Format: `{runner}-{label}-{seq:x}`.
/// - `runner`: `Runner::name()`
/// - `label`: `TaskSpec::label()`
/// - `seq`: per-process hex sequence, never reused across batches
pub fn make_run_id(runner_name: &str, label: &str) -> String {
    format!("{runner_name}-{label}-{seq:x}", seq = next_seq())
}
