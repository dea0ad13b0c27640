use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use rand::{SeedableRng, rngs::StdRng};
use simbatch_model::Seq;

use crate::{
    clock::{Clock, SystemClock},
    config::BatchConfig,
};

/// Golden-ratio increment; spreads per-task seeds derived from one batch seed.
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Shared build context passed to all runners.
#[derive(Clone)]
pub struct BuildContext {
    output_dir: PathBuf,
    clock: Arc<dyn Clock>,
    seed: Option<u64>,
    max_sleep_ms: u64,
    exclusive_artifacts: bool,
}

impl BuildContext {
    pub fn new(output_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            output_dir: output_dir.into(),
            clock,
            ..Self::default()
        }
    }

    /// Context carrying the artifact-related parts of a batch config.
    pub fn from_config(cfg: &BatchConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            output_dir: cfg.output_dir.clone(),
            clock,
            seed: cfg.seed,
            max_sleep_ms: cfg.max_sleep_ms,
            exclusive_artifacts: cfg.exclusive_artifacts,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn max_sleep_ms(&self) -> u64 {
        self.max_sleep_ms
    }

    pub fn exclusive_artifacts(&self) -> bool {
        self.exclusive_artifacts
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_sleep_ms(mut self, max_sleep_ms: u64) -> Self {
        self.max_sleep_ms = max_sleep_ms;
        self
    }

    pub fn with_exclusive_artifacts(mut self, exclusive: bool) -> Self {
        self.exclusive_artifacts = exclusive;
        self
    }

    /// Seed of the task with the given sequence number, if the batch is seeded.
    pub fn seed_for(&self, seq: Seq) -> Option<u64> {
        self.seed
            .map(|seed| seed ^ u64::from(seq).wrapping_mul(SEED_SPREAD))
    }

    /// Fresh RNG owned by one task.
    pub fn rng_for(&self, seq: Seq) -> StdRng {
        match self.seed_for(seq) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default(), Arc::new(SystemClock::utc()))
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("output_dir", &self.output_dir)
            .field("clock", &self.clock)
            .field("seed", &self.seed)
            .field("max_sleep_ms", &self.max_sleep_ms)
            .field("exclusive_artifacts", &self.exclusive_artifacts)
            .finish()
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuildContext(output_dir={})", self.output_dir.display())
    }
}
