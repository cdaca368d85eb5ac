//! Random choice of augmentation symmetry.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::group::Symmetry;

/// Draws symmetries uniformly from [`Symmetry::AUGMENTATIONS`].
///
/// Construct one per reader and keep it for the whole run. Seeding from
/// OS entropy gives each worker process an independent sequence; a fixed
/// seed makes the sequence reproducible.
#[derive(Clone, Debug)]
pub struct SymmetrySampler {
    rng: ChaCha8Rng,
}

impl SymmetrySampler {
    /// A sampler seeded from the operating system's CSPRNG.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// A deterministic sampler.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw the next symmetry.
    pub fn sample(&mut self) -> Symmetry {
        let i = self.rng.random_range(0..Symmetry::AUGMENTATIONS.len());
        Symmetry::AUGMENTATIONS[i]
    }
}
