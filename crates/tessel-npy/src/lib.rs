//! NumPy storage for training-example files.
//!
//! A training file is a set of named arrays. The usual container is an
//! `.npz` archive as produced by `numpy.savez_compressed`; a directory
//! holding one `.npy` file per array works too:
//!
//! ```text
//! selfplay/
//!     data-000.npz
//!     data-001.npz
//!     shard-002/
//!         binaryInputNCHWPacked.npy
//!         globalInputNC.npy
//!         ...
//! ```
//!
//! - [`discover`] lists both kinds under a parent directory
//! - [`NpzFile`] and [`NpyDir`] expose one file as an
//!   [`ArraySource`](tessel_core::ArraySource)
//! - [`read_npy`] / [`write_npy`] handle single arrays over any
//!   `Read` / `Write`
//!
//! Only C-ordered `bool`, `u8`, `i8`, `i16`, `i32`, `i64`, `f32` and
//! `f64` arrays are accepted.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dir;
pub mod npy;
pub mod npz;
pub mod source;

pub use dir::NpyDir;
pub use npy::{read_npy, read_npy_file, write_npy, write_npy_file};
pub use npz::NpzFile;
pub use source::{discover, TrainingFile};
