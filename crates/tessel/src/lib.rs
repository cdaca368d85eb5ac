//! Tessel: sharded, symmetry-augmented training batches for self-play
//! board-game learning.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessel sub-crates. For most users, adding `tessel` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessel::prelude::*;
//! use tessel::decode::{pack_bits_msb, packed_row_width};
//!
//! // One training file of 8 examples on a 3x3 board, held in memory.
//! let (n, pos_len) = (8, 3);
//! let model = ModelConfig {
//!     num_bin_input_features: 3,
//!     num_global_input_features: 1,
//!     layout: FeatureLayout { own: 1..2, opponent: 2..3, side_to_move: 0 },
//! };
//! let plane = pack_bits_msb(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
//! let width = packed_row_width(pos_len * pos_len);
//! let f32s = |dims: &[usize]| {
//!     let len = dims.iter().product();
//!     RawArray::new(dims, ArrayData::F32(vec![0.0; len])).unwrap()
//! };
//! let packed = RawArray::new(&[n, 3, width], ArrayData::U8(plane.repeat(n * 3))).unwrap();
//! let file = MemoryArrays::new("demo")
//!     .with(keys::BINARY_INPUT, packed)
//!     .with(keys::GLOBAL_INPUT, f32s(&[n, 1]))
//!     .with(keys::POLICY_TARGETS, f32s(&[n, 1, pos_len * pos_len + 1]))
//!     .with(keys::GLOBAL_TARGETS, f32s(&[n, 2]))
//!     .with(keys::SCORE_DISTRIBUTION, f32s(&[n, 4]))
//!     .with(keys::VALUE_TARGETS, f32s(&[n, 1, pos_len, pos_len]));
//!
//! // Two workers; this is rank 1.
//! let config = PipelineConfig {
//!     batch_size: 2,
//!     world_size: 2,
//!     rank: 1,
//!     pos_len,
//!     randomize_symmetries: true,
//!     seed: Some(7),
//! };
//! let reader = TrainingReader::new(config, model, Cpu, vec![file]).unwrap();
//! let ranges: Vec<_> = reader.map(|b| b.unwrap().info.range).collect();
//! assert_eq!(ranges, vec![2..4, 6..8]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessel-core` | Tensors, named arrays, model config, errors |
//! | [`decode`] | `tessel-decode` | MSB-first bit planes, binary-input decoding |
//! | [`shard`] | `tessel-shard` | Rank-interleaved whole-step sharding |
//! | [`symmetry`] | `tessel-symmetry` | Dihedral board symmetries and sampling |
//! | [`npy`] | `tessel-npy` | `.npz` archives, `.npy` arrays and directories |
//! | [`pipeline`] | `tessel-pipeline` | Batch record and the lazy reader |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits and errors (`tessel-core`).
///
/// [`types::Tensor`], [`types::RawArray`], the [`types::ArraySource`]
/// container trait, and [`types::ModelConfig`].
pub use tessel_core as types;

/// Bit-packed plane decoding (`tessel-decode`).
pub use tessel_decode as decode;

/// Whole-step sharding across workers (`tessel-shard`).
///
/// [`shard::ShardPlan`] computes each rank's example ranges for a file.
pub use tessel_shard as shard;

/// Board symmetries (`tessel-symmetry`).
pub use tessel_symmetry as symmetry;

/// NumPy storage (`tessel-npy`).
///
/// [`npy::NpzFile`] reads an `.npz` archive as one training file,
/// [`npy::NpyDir`] a directory of `<key>.npy` files, and
/// [`npy::discover`] finds both.
pub use tessel_npy as npy;

/// The batch reader (`tessel-pipeline`).
pub use tessel_pipeline as pipeline;

/// Common imports for typical Tessel usage.
///
/// ```rust
/// use tessel::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use tessel_core::{
        keys, ArrayData, ArraySource, FeatureLayout, InputFeatures, MemoryArrays, ModelConfig,
        RawArray, Tensor,
    };

    // Errors
    pub use tessel_core::{ConfigError, ShapeError, SourceError};
    pub use tessel_pipeline::PipelineError;

    // Sharding and symmetry
    pub use tessel_shard::{ShardPlan, WorkerSpec};
    pub use tessel_symmetry::{Symmetry, SymmetrySampler};

    // Storage
    pub use tessel_npy::{discover, NpyDir, NpzFile, TrainingFile};

    // Pipeline
    pub use tessel_pipeline::{
        Batch, BatchInfo, Cpu, Device, PipelineConfig, ReaderStats, TrainingReader,
    };
}
