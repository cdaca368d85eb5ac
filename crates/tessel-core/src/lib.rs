//! Core types for the Tessel training-data pipeline.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared by every stage of the pipeline: dense
//! tensors, raw named arrays and the containers that hold them, the
//! model-side input configuration, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod config;
pub mod error;
pub mod tensor;

pub use array::{keys, ArrayData, ArraySource, MemoryArrays, RawArray};
pub use config::{FeatureLayout, InputFeatures, ModelConfig};
pub use error::{ConfigError, ShapeError, SourceError};
pub use tensor::{element_count, Shape, Tensor};
