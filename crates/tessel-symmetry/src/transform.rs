//! Applying a [`Symmetry`] to batch tensors.
//!
//! Spatial tensors are transformed on their trailing two axes; every
//! leading axis (examples, channels) is carried through unchanged. The
//! policy variant treats the last axis as `L*L` board cells followed by
//! one pass slot, and only the cells move.

use std::ops::Range;

use tessel_core::{keys, FeatureLayout, ShapeError, Tensor};

use crate::group::Symmetry;

/// Transform the trailing `n x n` plane of every leading index.
///
/// # Errors
///
/// [`ShapeError::Rank`] for tensors with fewer than two axes and
/// [`ShapeError::NonSquare`] when the trailing two axes differ.
pub fn apply(tensor: &Tensor, sym: Symmetry) -> Result<Tensor, ShapeError> {
    let dims = tensor.dims();
    if dims.len() < 2 {
        return Err(ShapeError::Rank {
            array: "spatial tensor",
            expected: 2,
            actual: dims.len(),
        });
    }
    let (rows, cols) = (dims[dims.len() - 2], dims[dims.len() - 1]);
    if rows != cols {
        return Err(ShapeError::NonSquare { rows, cols });
    }
    if sym == Symmetry::Identity {
        return Ok(tensor.clone());
    }

    let cells = rows * cols;
    let perm = sym.permutation(rows);
    let mut out = Tensor::zeros(dims);
    if cells > 0 {
        let src = tensor.as_slice().chunks_exact(cells);
        let dst = out.as_mut_slice().chunks_exact_mut(cells);
        for (plane_in, plane_out) in src.zip(dst) {
            permute_into(plane_in, &perm, plane_out);
        }
    }
    Ok(out)
}

/// Transform a policy tensor whose last axis is `pos_len^2` cells plus
/// a trailing pass slot. The pass slot is copied through untouched.
///
/// # Errors
///
/// [`ShapeError::Rank`] for a rank-0 tensor and
/// [`ShapeError::PolicyLength`] if the last axis is not `pos_len^2 + 1`.
pub fn apply_policy(policy: &Tensor, sym: Symmetry, pos_len: usize) -> Result<Tensor, ShapeError> {
    let dims = policy.dims();
    let Some(&len) = dims.last() else {
        return Err(ShapeError::Rank {
            array: keys::POLICY_TARGETS,
            expected: 3,
            actual: 0,
        });
    };
    let cells = pos_len * pos_len;
    if len != cells + 1 {
        return Err(ShapeError::PolicyLength {
            expected: cells + 1,
            actual: len,
        });
    }
    if sym == Symmetry::Identity {
        return Ok(policy.clone());
    }

    let perm = sym.permutation(pos_len);
    let mut out = Tensor::zeros(dims);
    let src = policy.as_slice().chunks_exact(len);
    let dst = out.as_mut_slice().chunks_exact_mut(len);
    for (row_in, row_out) in src.zip(dst) {
        permute_into(&row_in[..cells], &perm, &mut row_out[..cells]);
        row_out[cells] = row_in[cells];
    }
    Ok(out)
}

/// Exchange the own and opponent planes of `binary` and complement the
/// side-to-move feature of `global`, for every example.
///
/// `binary` is `(N, C, L, L)` and `global` is `(N, G)`.
///
/// # Errors
///
/// [`ShapeError::Rank`], [`ShapeError::LeadingDim`] or
/// [`ShapeError::FeatureCount`] if the tensors cannot hold `layout`.
pub fn swap_sides(
    binary: &mut Tensor,
    global: &mut Tensor,
    layout: &FeatureLayout,
) -> Result<(), ShapeError> {
    check_rank(binary, keys::BINARY_INPUT, 4)?;
    check_rank(global, keys::GLOBAL_INPUT, 2)?;
    if global.leading_dim() != binary.leading_dim() {
        return Err(ShapeError::LeadingDim {
            array: keys::GLOBAL_INPUT,
            expected: binary.leading_dim(),
            actual: global.leading_dim(),
        });
    }
    let channels = binary.dims()[1];
    let needed = layout.own.end.max(layout.opponent.end);
    if channels < needed {
        return Err(ShapeError::FeatureCount {
            array: keys::BINARY_INPUT,
            expected: needed,
            actual: channels,
        });
    }
    let num_global = global.dims()[1];
    if layout.side_to_move >= num_global {
        return Err(ShapeError::FeatureCount {
            array: keys::GLOBAL_INPUT,
            expected: layout.side_to_move + 1,
            actual: num_global,
        });
    }

    let plane = binary.dims()[2] * binary.dims()[3];
    let row_len = binary.row_len();
    if row_len > 0 {
        let own = scale(&layout.own, plane);
        let opponent = scale(&layout.opponent, plane);
        for example in binary.as_mut_slice().chunks_exact_mut(row_len) {
            swap_blocks(example, own.clone(), opponent.clone());
        }
    }
    for row in global.as_mut_slice().chunks_exact_mut(num_global) {
        let x = &mut row[layout.side_to_move];
        *x = 1.0 - *x;
    }
    Ok(())
}

fn permute_into(src: &[f32], perm: &[usize], dst: &mut [f32]) {
    for (out, &from) in dst.iter_mut().zip(perm) {
        *out = src[from];
    }
}

fn check_rank(t: &Tensor, array: &'static str, expected: usize) -> Result<(), ShapeError> {
    if t.rank() != expected {
        return Err(ShapeError::Rank {
            array,
            expected,
            actual: t.rank(),
        });
    }
    Ok(())
}

fn scale(planes: &Range<usize>, plane_len: usize) -> Range<usize> {
    planes.start * plane_len..planes.end * plane_len
}

/// Swap two disjoint, equal-length blocks of `row`.
fn swap_blocks(row: &mut [f32], a: Range<usize>, b: Range<usize>) {
    let (first, second) = if a.start <= b.start { (a, b) } else { (b, a) };
    let (head, tail) = row.split_at_mut(second.start);
    head[first].swap_with_slice(&mut tail[..second.len()]);
}
