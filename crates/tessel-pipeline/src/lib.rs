//! Sharded, symmetry-augmented training batches.
//!
//! [`TrainingReader`] turns a sequence of training files (anything
//! implementing [`ArraySource`](tessel_core::ArraySource)) into this
//! worker's stream of [`Batch`]es:
//!
//! 1. decode and validate the file once ([`DecodedFile`]),
//! 2. plan this rank's whole steps ([`ShardPlan`](tessel_shard::ShardPlan)),
//! 3. per step: slice, [`Device::transfer`], then apply one random
//!    [`Symmetry`](tessel_symmetry::Symmetry) to the whole batch.
//!
//! The reader is single-threaded and pull-based. Workers coordinate only
//! through their rank; no state is shared between processes.
//!
//! Progress is reported through `tracing`: one `info` event per file,
//! one `debug` event per batch, and `warn` events for files that fail or
//! are too small to yield a batch. Installing a subscriber is left to
//! the application.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod device;
pub mod error;
pub mod file;
pub mod reader;

pub use batch::{Batch, BatchInfo};
pub use config::PipelineConfig;
pub use device::{Cpu, Device};
pub use error::PipelineError;
pub use file::DecodedFile;
pub use reader::{ReaderStats, TrainingReader};
