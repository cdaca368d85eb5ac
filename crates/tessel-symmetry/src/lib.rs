//! Board symmetries for training-batch augmentation.
//!
//! [`Symmetry`] enumerates the eight elements of the dihedral group of
//! the square. [`apply`] and [`apply_policy`] move board cells on
//! spatial and policy tensors; [`swap_sides`] performs the own/opponent
//! exchange that [`Symmetry::swaps_sides`] calls for. [`SymmetrySampler`]
//! picks one augmentation per batch.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod group;
pub mod sampler;
pub mod transform;

pub use group::Symmetry;
pub use sampler::SymmetrySampler;
pub use transform::{apply, apply_policy, swap_sides};
