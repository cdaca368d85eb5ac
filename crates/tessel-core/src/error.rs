//! Error types for the Tessel training-data pipeline.
//!
//! Organized by failure class: structural shape violations
//! ([`ShapeError`]), invalid pipeline or model configuration
//! ([`ConfigError`]), and failures of the external array container
//! ([`SourceError`]). None of these are retryable; the caller decides
//! whether to skip the offending file or abort the run.

use std::error::Error;
use std::fmt;
use std::io;

/// A structural precondition on array shapes failed.
///
/// Fatal to the current file's processing. Never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// A feature axis does not match the count implied by the model config.
    FeatureCount {
        /// Canonical name of the offending array.
        array: &'static str,
        /// Count required by the model configuration.
        expected: usize,
        /// Count found in the array.
        actual: usize,
    },
    /// A spatial tensor's trailing two dimensions differ.
    NonSquare {
        /// Size of the second-to-last axis.
        rows: usize,
        /// Size of the last axis.
        cols: usize,
    },
    /// The packed bit axis is not the byte-padded width of one board.
    PackedWidth {
        /// Padded bit count implied by the position length.
        expected: usize,
        /// Bit count found after unpacking.
        actual: usize,
    },
    /// An array has the wrong number of axes.
    Rank {
        /// Canonical name of the offending array.
        array: &'static str,
        /// Required number of axes.
        expected: usize,
        /// Number of axes found.
        actual: usize,
    },
    /// An array's example count disagrees with the binary input's.
    LeadingDim {
        /// Canonical name of the offending array.
        array: &'static str,
        /// Example count of the binary input.
        expected: usize,
        /// Example count found.
        actual: usize,
    },
    /// The policy axis is not `pos_len * pos_len + 1` long.
    PolicyLength {
        /// Required length (board cells plus the pass slot).
        expected: usize,
        /// Length found.
        actual: usize,
    },
    /// A spatial array's board side differs from the configured `pos_len`.
    BoardSize {
        /// Canonical name of the offending array.
        array: &'static str,
        /// Configured position length.
        expected: usize,
        /// Board side found.
        actual: usize,
    },
    /// A buffer's element count does not match the product of its shape.
    ElementCount {
        /// Product of the declared shape.
        expected: usize,
        /// Length of the buffer.
        actual: usize,
    },
    /// An array has an element type the consumer cannot use.
    Dtype {
        /// Canonical name of the offending array.
        array: &'static str,
        /// Required element type.
        expected: &'static str,
        /// Element type found.
        actual: &'static str,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeatureCount {
                array,
                expected,
                actual,
            } => write!(
                f,
                "{array}: expected {expected} features from the model config, found {actual}"
            ),
            Self::NonSquare { rows, cols } => {
                write!(f, "spatial axes must be square, got {rows}x{cols}")
            }
            Self::PackedWidth { expected, actual } => write!(
                f,
                "packed board width unpacks to {actual} bits, expected {expected}"
            ),
            Self::Rank {
                array,
                expected,
                actual,
            } => write!(f, "{array}: expected {expected} axes, found {actual}"),
            Self::LeadingDim {
                array,
                expected,
                actual,
            } => write!(
                f,
                "{array}: holds {actual} examples, binary input holds {expected}"
            ),
            Self::PolicyLength { expected, actual } => write!(
                f,
                "policy axis has {actual} entries, expected {expected} (cells + pass)"
            ),
            Self::ElementCount { expected, actual } => write!(
                f,
                "buffer holds {actual} elements, shape requires {expected}"
            ),
            Self::BoardSize {
                array,
                expected,
                actual,
            } => write!(f, "{array}: board side {actual} differs from pos_len {expected}"),
            Self::Dtype {
                array,
                expected,
                actual,
            } => write!(f, "{array}: expected dtype {expected}, found {actual}"),
        }
    }
}

impl Error for ShapeError {}

/// Invalid pipeline or model configuration.
///
/// Detected at construction time, before any file is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `batch_size` is zero.
    ZeroBatchSize,
    /// `world_size` is zero.
    ZeroWorldSize,
    /// `rank` is not in `0..world_size`.
    RankOutOfRange {
        /// The configured rank.
        rank: usize,
        /// The configured worker count.
        world_size: usize,
    },
    /// `pos_len` is zero.
    ZeroPositionLength,
    /// The own/opponent/side-to-move layout does not fit the feature counts.
    InvalidFeatureLayout {
        /// What is wrong with the layout.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBatchSize => write!(f, "batch_size must be at least 1"),
            Self::ZeroWorldSize => write!(f, "world_size must be at least 1"),
            Self::RankOutOfRange { rank, world_size } => {
                write!(f, "rank {rank} out of range for world_size {world_size}")
            }
            Self::ZeroPositionLength => write!(f, "pos_len must be at least 1"),
            Self::InvalidFeatureLayout { reason } => {
                write!(f, "invalid feature layout: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Failure reading a named array from an external container.
#[derive(Debug)]
pub enum SourceError {
    /// The container has no array under this key.
    MissingArray {
        /// The requested key.
        name: String,
    },
    /// An I/O error occurred while reading the container.
    Io(io::Error),
    /// The container's bytes could not be decoded.
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The array's element type is not supported.
    UnsupportedDtype {
        /// The type descriptor found in the container.
        descr: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArray { name } => write!(f, "no array named '{name}'"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Malformed { detail } => write!(f, "malformed array: {detail}"),
            Self::UnsupportedDtype { descr } => write!(f, "unsupported dtype '{descr}'"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
