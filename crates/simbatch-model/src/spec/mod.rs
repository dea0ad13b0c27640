mod entry;
pub use entry::EntryArgs;

mod task;
pub use task::TaskSpec;
