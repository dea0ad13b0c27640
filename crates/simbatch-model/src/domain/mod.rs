mod category;
pub use category::Category;

mod counts;
pub use counts::Counts;

mod timestamp;
pub use timestamp::Timestamp;

/// Launch position of a task inside its batch (1-based).
///
/// Unique within one batch run; a standalone entry-point invocation is a batch of one.
pub type Seq = u32;

/// Timeout value in milliseconds.
///
/// Used by batch configuration where an explicit per-task limit is required.
pub type TimeoutMs = u64;
