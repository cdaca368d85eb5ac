//! Dense row-major `f32` tensors and the [`Shape`] type alias.

use std::ops::Range;

use smallvec::SmallVec;

use crate::error::ShapeError;

/// Tensor dimensions, outermost first.
///
/// Every tensor in a training batch has at most four axes
/// (`N, C, H, W`), so shapes stay inline.
pub type Shape = SmallVec<[usize; 4]>;

/// Number of elements described by a shape.
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// A dense, contiguous, row-major `f32` tensor.
///
/// The leading axis is always the example axis when a tensor is part
/// of a training batch. Slicing along it is a contiguous copy of
/// [`row_len`](Tensor::row_len) elements per example.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Wrap `data` with the given shape.
    ///
    /// Returns `Err(ShapeError::ElementCount)` if the buffer length is not
    /// the product of the shape.
    pub fn new(shape: &[usize], data: Vec<f32>) -> Result<Self, ShapeError> {
        let shape = Shape::from_slice(shape);
        let expected = element_count(&shape);
        if data.len() != expected {
            return Err(ShapeError::ElementCount {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Wrap a buffer whose length is already known to match `shape`.
    pub(crate) fn from_parts(shape: Shape, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), element_count(&shape));
        Self { shape, data }
    }

    /// A tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        let shape = Shape::from_slice(shape);
        let data = vec![0.0; element_count(&shape)];
        Self { shape, data }
    }

    /// Build a tensor by evaluating `f` at each flat (row-major) index.
    pub fn from_fn(shape: &[usize], f: impl FnMut(usize) -> f32) -> Self {
        let shape = Shape::from_slice(shape);
        let data = (0..element_count(&shape)).map(f).collect();
        Self { shape, data }
    }

    /// The tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The tensor's dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the leading (example) axis, or 0 for a rank-0 tensor.
    pub fn leading_dim(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Elements per index of the leading axis.
    pub fn row_len(&self) -> usize {
        element_count(self.shape.get(1..).unwrap_or(&[]))
    }

    /// Flat element buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable flat element buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the tensor, returning its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Copy out `range` along the leading axis.
    ///
    /// # Panics
    ///
    /// Panics if `range` exceeds the leading dimension. The pipeline only
    /// slices ranges produced by the shard scheduler, which never does.
    pub fn slice_leading(&self, range: Range<usize>) -> Tensor {
        assert!(
            range.start <= range.end && range.end <= self.leading_dim(),
            "slice {range:?} out of bounds for leading dim {}",
            self.leading_dim()
        );
        let row = self.row_len();
        let mut shape = self.shape.clone();
        shape[0] = range.len();
        Tensor {
            shape,
            data: self.data[range.start * row..range.end * row].to_vec(),
        }
    }

    /// Reinterpret the buffer with a new shape of the same element count.
    pub fn reshape(self, shape: &[usize]) -> Result<Tensor, ShapeError> {
        Tensor::new(shape, self.data)
    }

    /// Flat offset of a full multi-index, or `None` if out of bounds.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }

    /// Element at a full multi-index.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.offset(index).map(|o| self.data[o])
    }
}
