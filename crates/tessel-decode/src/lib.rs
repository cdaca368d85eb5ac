//! Decoding of bit-packed board planes into dense feature tensors.
//!
//! Training files store binary spatial features one bit per cell,
//! MSB-first, each `(example, channel)` plane padded to a byte boundary.
//! [`decode_binary_input`] unpacks them into an `(N, C, L, L)` tensor and
//! [`validate_feature_counts`] checks the result against the model's
//! expected input sizes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bits;
pub mod decode;

pub use bits::{pack_bits_msb, packed_row_width, padded_bits, unpack_bits_msb, unpack_bits_msb_into};
pub use decode::{decode_binary_input, validate_feature_counts};
