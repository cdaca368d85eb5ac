//! Binary-input decoding and input feature-count validation.

use tessel_core::{keys, InputFeatures, RawArray, ShapeError, Tensor};

use crate::bits::{padded_bits, unpack_bits_msb_into};

/// Unpack `binaryInputNCHWPacked` into a dense `(N, C, L, L)` tensor.
///
/// `packed` must be a rank-3 `u8` array of shape `(N, C, W)` where
/// `8 * W` is the smallest multiple of 8 that is `>= L*L`. Each
/// `(example, channel)` row keeps its first `L*L` bits.
///
/// # Errors
///
/// [`ShapeError::Rank`], [`ShapeError::Dtype`] or
/// [`ShapeError::PackedWidth`] if the packed array does not fit the
/// contract above.
pub fn decode_binary_input(packed: &RawArray, pos_len: usize) -> Result<Tensor, ShapeError> {
    let dims = packed.dims();
    if dims.len() != 3 {
        return Err(ShapeError::Rank {
            array: keys::BINARY_INPUT,
            expected: 3,
            actual: dims.len(),
        });
    }
    let bytes = packed.as_u8().ok_or(ShapeError::Dtype {
        array: keys::BINARY_INPUT,
        expected: "u8",
        actual: packed.data().dtype_name(),
    })?;

    let (n, c, width) = (dims[0], dims[1], dims[2]);
    let cells = pos_len * pos_len;
    if width * 8 != padded_bits(cells) {
        return Err(ShapeError::PackedWidth {
            expected: padded_bits(cells),
            actual: width * 8,
        });
    }

    let mut out = Tensor::zeros(&[n, c, pos_len, pos_len]);
    if cells > 0 {
        let rows = bytes.chunks_exact(width);
        let planes = out.as_mut_slice().chunks_exact_mut(cells);
        for (row, plane) in rows.zip(planes) {
            unpack_bits_msb_into(row, cells, plane);
        }
    }
    Ok(out)
}

/// Check decoded inputs against the feature counts the model expects.
///
/// `binary` is the decoded `(N, C, L, L)` tensor and `global` the
/// `(N, G)` global input.
pub fn validate_feature_counts(
    binary: &Tensor,
    global: &Tensor,
    features: &dyn InputFeatures,
) -> Result<(), ShapeError> {
    if binary.rank() != 4 {
        return Err(ShapeError::Rank {
            array: keys::BINARY_INPUT,
            expected: 4,
            actual: binary.rank(),
        });
    }
    if global.rank() != 2 {
        return Err(ShapeError::Rank {
            array: keys::GLOBAL_INPUT,
            expected: 2,
            actual: global.rank(),
        });
    }
    let expected = features.num_bin_input_features();
    if binary.dims()[1] != expected {
        return Err(ShapeError::FeatureCount {
            array: keys::BINARY_INPUT,
            expected,
            actual: binary.dims()[1],
        });
    }
    let expected = features.num_global_input_features();
    if global.dims()[1] != expected {
        return Err(ShapeError::FeatureCount {
            array: keys::GLOBAL_INPUT,
            expected,
            actual: global.dims()[1],
        });
    }
    Ok(())
}
