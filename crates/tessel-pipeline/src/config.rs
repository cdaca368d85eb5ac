//! Reader configuration.

use tessel_core::ConfigError;
use tessel_shard::WorkerSpec;

/// Parameters of one worker's [`TrainingReader`](crate::TrainingReader).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Examples per batch on this worker. Default: 128.
    pub batch_size: usize,
    /// Number of data-parallel workers. Default: 1.
    pub world_size: usize,
    /// This worker's rank in `0..world_size`. Default: 0.
    pub rank: usize,
    /// Board side length. Default: 13.
    pub pos_len: usize,
    /// Apply one random symmetry per batch. Default: true.
    pub randomize_symmetries: bool,
    /// Symmetry generator seed. `None` seeds from OS entropy, so
    /// distinct processes draw independent sequences. Default: `None`.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 128,
            world_size: 1,
            rank: 0,
            pos_len: 13,
            randomize_symmetries: true,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.worker_spec()?;
        if self.pos_len == 0 {
            return Err(ConfigError::ZeroPositionLength);
        }
        Ok(())
    }

    /// This worker's sharding parameters.
    pub fn worker_spec(&self) -> Result<WorkerSpec, ConfigError> {
        WorkerSpec::new(self.batch_size, self.world_size, self.rank)
    }
}
