use serde::{Deserialize, Serialize};

use crate::{
    domain::{Category, Counts, Seq, Timestamp},
    strategy::Strategy,
};

/// One unit of work inside a batch.
///
/// `index` is the number written into the artifact name (`n<index>`):
/// - thread tasks use their batch sequence number;
/// - process tasks use the count of their category, which is also what the child receives on its command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskSpec {
    pub strategy: Strategy,
    pub category: Category,
    pub seq: Seq,
    pub index: u32,
}

impl TaskSpec {
    pub fn new(strategy: Strategy, category: Category, seq: Seq, index: u32) -> Self {
        Self {
            strategy,
            category,
            seq,
            index,
        }
    }

    /// Expand per-category counts into task specs.
    ///
    /// Order is category-major, then instance-minor; `seq` runs from 1 to `counts.total()`.
    pub fn fan_out(strategy: Strategy, counts: &Counts) -> Vec<TaskSpec> {
        let mut specs = Vec::with_capacity(counts.total());
        let mut seq: Seq = 0;

        for (category, count) in counts.iter() {
            for _ in 0..count {
                seq += 1;
                let index = match strategy {
                    Strategy::Process => count,
                    Strategy::Thread => seq,
                };
                specs.push(TaskSpec::new(strategy, category, seq, index));
            }
        }
        specs
    }

    /// Short label for logs, e.g. `mt-c2-s5`.
    pub fn label(&self) -> String {
        format!(
            "{}-c{}-s{}",
            self.strategy.mode().to_ascii_lowercase(),
            self.category,
            self.seq
        )
    }

    /// Artifact file name: `PROT_<MODE>_<category>_n<index>_<start>.sim`.
    pub fn artifact_name(&self, start: &Timestamp) -> String {
        format!(
            "PROT_{}_{}_n{}_{}.sim",
            self.strategy.mode(),
            self.category,
            self.index,
            start
        )
    }
}
