//! Whole-step sharding of a training file across distributed workers.
//!
//! A file of `N` examples is consumed in *whole steps* of
//! `batch_size * world_size` examples. Within a step, workers take
//! consecutive `batch_size` slices in rank order, so rank `r` owns
//!
//! ```text
//! [(n * W + r) * B, (n * W + r) * B + B)    for n in 0..whole_steps
//! ```
//!
//! Ranges never overlap across `(rank, step)` pairs, and the union over
//! all ranks is the contiguous prefix `[0, whole_steps * B * W)`. Any
//! remainder past that prefix is discarded. Workers never exchange
//! messages; the partition follows from the rank alone.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::ops::Range;

use tessel_core::ConfigError;

/// One worker's identity within a data-parallel job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkerSpec {
    batch_size: usize,
    world_size: usize,
    rank: usize,
}

impl WorkerSpec {
    /// Validate and build a worker spec.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroBatchSize`], [`ConfigError::ZeroWorldSize`] or
    /// [`ConfigError::RankOutOfRange`].
    pub fn new(batch_size: usize, world_size: usize, rank: usize) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if world_size == 0 {
            return Err(ConfigError::ZeroWorldSize);
        }
        if rank >= world_size {
            return Err(ConfigError::RankOutOfRange { rank, world_size });
        }
        Ok(Self {
            batch_size,
            world_size,
            rank,
        })
    }

    /// The single-process case: world size 1, rank 0.
    pub fn single(batch_size: usize) -> Result<Self, ConfigError> {
        Self::new(batch_size, 1, 0)
    }

    /// Examples per worker per step.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of workers.
    pub fn world_size(&self) -> usize {
        self.world_size
    }

    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Examples consumed by all workers together in one step.
    pub fn step_len(&self) -> usize {
        self.batch_size * self.world_size
    }
}

/// The slices of one file owned by one worker.
///
/// # Examples
///
/// ```
/// use tessel_shard::{ShardPlan, WorkerSpec};
///
/// let spec = WorkerSpec::new(4, 3, 1).unwrap();
/// let plan = ShardPlan::new(1000, spec);
/// assert_eq!(plan.whole_steps(), 83);
/// assert_eq!(plan.step_range(0), Some(4..8));
/// assert_eq!(plan.discarded(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShardPlan {
    spec: WorkerSpec,
    num_examples: usize,
    whole_steps: usize,
}

impl ShardPlan {
    /// Plan a file of `num_examples` examples for `spec`.
    pub fn new(num_examples: usize, spec: WorkerSpec) -> Self {
        Self {
            spec,
            num_examples,
            whole_steps: num_examples / spec.step_len(),
        }
    }

    /// The worker this plan belongs to.
    pub fn spec(&self) -> &WorkerSpec {
        &self.spec
    }

    /// Examples in the file.
    pub fn num_examples(&self) -> usize {
        self.num_examples
    }

    /// Full cross-worker steps the file supports.
    pub fn whole_steps(&self) -> usize {
        self.whole_steps
    }

    /// Batches produced by all workers together.
    pub fn usable_batches(&self) -> usize {
        self.whole_steps * self.spec.world_size
    }

    /// Length of the prefix consumed across all workers.
    pub fn consumed_len(&self) -> usize {
        self.whole_steps * self.spec.step_len()
    }

    /// Trailing examples no worker consumes.
    pub fn discarded(&self) -> usize {
        self.num_examples - self.consumed_len()
    }

    /// This worker's example range for `step`, or `None` past the last
    /// whole step.
    pub fn step_range(&self, step: usize) -> Option<Range<usize>> {
        if step >= self.whole_steps {
            return None;
        }
        let start = (step * self.spec.world_size + self.spec.rank) * self.spec.batch_size;
        Some(start..start + self.spec.batch_size)
    }

    /// All of this worker's ranges, in step order.
    pub fn ranges(&self) -> Ranges {
        Ranges {
            plan: *self,
            step: 0,
        }
    }
}

impl IntoIterator for &ShardPlan {
    type Item = Range<usize>;
    type IntoIter = Ranges;

    fn into_iter(self) -> Ranges {
        self.ranges()
    }
}

/// Iterator over a [`ShardPlan`]'s ranges.
#[derive(Clone, Debug)]
pub struct Ranges {
    plan: ShardPlan,
    step: usize,
}

impl Iterator for Ranges {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let range = self.plan.step_range(self.step)?;
        self.step += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.plan.whole_steps.saturating_sub(self.step);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Ranges {}

impl std::iter::FusedIterator for Ranges {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn worker_spec_rejects_bad_parameters() {
        assert_eq!(WorkerSpec::new(0, 1, 0), Err(ConfigError::ZeroBatchSize));
        assert_eq!(WorkerSpec::new(4, 0, 0), Err(ConfigError::ZeroWorldSize));
        assert_eq!(
            WorkerSpec::new(4, 3, 3),
            Err(ConfigError::RankOutOfRange {
                rank: 3,
                world_size: 3
            })
        );
        assert!(WorkerSpec::single(1).is_ok());
    }

    #[test]
    fn three_workers_interleave_in_rank_order() {
        let plans: Vec<ShardPlan> = (0..3)
            .map(|r| ShardPlan::new(1000, WorkerSpec::new(4, 3, r).unwrap()))
            .collect();
        assert_eq!(plans[0].whole_steps(), 83);
        assert_eq!(plans[0].usable_batches(), 249);
        assert_eq!(plans[0].step_range(0), Some(0..4));
        assert_eq!(plans[1].step_range(0), Some(4..8));
        assert_eq!(plans[2].step_range(0), Some(8..12));
        assert_eq!(plans[0].step_range(1), Some(12..16));
        assert_eq!(plans[2].step_range(82), Some(992..996));
        assert_eq!(plans[2].step_range(83), None);
        assert_eq!(plans[0].consumed_len(), 996);
        assert_eq!(plans[0].discarded(), 4);
    }

    #[test]
    fn file_smaller_than_one_step_yields_nothing() {
        let plan = ShardPlan::new(11, WorkerSpec::new(4, 3, 0).unwrap());
        assert_eq!(plan.whole_steps(), 0);
        assert_eq!(plan.ranges().count(), 0);
        assert_eq!(plan.discarded(), 11);
    }

    #[test]
    fn exact_multiple_discards_nothing() {
        let plan = ShardPlan::new(24, WorkerSpec::new(4, 3, 2).unwrap());
        assert_eq!(plan.discarded(), 0);
        let ranges: Vec<_> = (&plan).into_iter().collect();
        assert_eq!(ranges, vec![8..12, 20..24]);
    }

    #[test]
    fn ranges_report_exact_length() {
        let plan = ShardPlan::new(100, WorkerSpec::new(5, 2, 1).unwrap());
        let mut it = plan.ranges();
        assert_eq!(it.len(), 10);
        it.next();
        assert_eq!(it.len(), 9);
    }

    proptest! {
        #[test]
        fn ranks_partition_the_consumed_prefix(
            batch in 1usize..16,
            world in 1usize..8,
            extra in 0usize..500,
        ) {
            let n = batch * world + extra;
            let mut covered = vec![0u8; n];
            let mut consumed = 0;
            for rank in 0..world {
                let plan = ShardPlan::new(n, WorkerSpec::new(batch, world, rank).unwrap());
                consumed = plan.consumed_len();
                for range in plan.ranges() {
                    prop_assert_eq!(range.len(), batch);
                    for i in range {
                        covered[i] += 1;
                    }
                }
            }
            prop_assert!(covered[..consumed].iter().all(|&c| c == 1));
            prop_assert!(covered[consumed..].iter().all(|&c| c == 0));
            prop_assert!(n - consumed < batch * world);
        }
    }
}
