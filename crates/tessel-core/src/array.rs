//! Raw named arrays as stored in training-example files.
//!
//! A training file is a bundle of same-length parallel arrays looked up
//! by name. [`ArraySource`] is the only contract the pipeline needs from
//! a container; [`MemoryArrays`] is an in-memory implementation and
//! `tessel-npy` provides one backed by `.npy` files.

use indexmap::IndexMap;

use crate::error::{ShapeError, SourceError};
use crate::tensor::{element_count, Shape, Tensor};

/// Canonical array names inside a training-example file.
pub mod keys {
    /// Bit-packed binary spatial features, `(N, C, ceil(L*L/8))`, `u8`.
    pub const BINARY_INPUT: &str = "binaryInputNCHWPacked";
    /// Global (non-spatial) input features, `(N, G)`.
    pub const GLOBAL_INPUT: &str = "globalInputNC";
    /// Policy targets over cells plus the pass slot, `(N, C, L*L + 1)`.
    pub const POLICY_TARGETS: &str = "policyTargetsNCMove";
    /// Global scalar targets, `(N, T)`.
    pub const GLOBAL_TARGETS: &str = "globalTargetsNC";
    /// Score distribution, `(N, S)`.
    pub const SCORE_DISTRIBUTION: &str = "scoreDistrN";
    /// Spatial value targets, `(N, C, L, L)`.
    pub const VALUE_TARGETS: &str = "valueTargetsNCHW";

    /// All six keys, in batch order.
    pub const ALL: [&str; 6] = [
        BINARY_INPUT,
        GLOBAL_INPUT,
        POLICY_TARGETS,
        GLOBAL_TARGETS,
        SCORE_DISTRIBUTION,
        VALUE_TARGETS,
    ];
}

/// Typed element buffer of a raw array.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayData {
    /// Unsigned bytes (also used for packed bits and booleans).
    U8(Vec<u8>),
    /// Signed bytes.
    I8(Vec<i8>),
    /// 16-bit signed integers.
    I16(Vec<i16>),
    /// 32-bit signed integers.
    I32(Vec<i32>),
    /// 64-bit signed integers.
    I64(Vec<i64>),
    /// 32-bit floats.
    F32(Vec<f32>),
    /// 64-bit floats.
    F64(Vec<f64>),
}

impl ArrayData {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short element type name, as used in error messages.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
        }
    }

    /// Element-wise cast to `f32`.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            Self::U8(v) => v.iter().map(|&x| x as f32).collect(),
            Self::I8(v) => v.iter().map(|&x| x as f32).collect(),
            Self::I16(v) => v.iter().map(|&x| x as f32).collect(),
            Self::I32(v) => v.iter().map(|&x| x as f32).collect(),
            Self::I64(v) => v.iter().map(|&x| x as f32).collect(),
            Self::F32(v) => v.clone(),
            Self::F64(v) => v.iter().map(|&x| x as f32).collect(),
        }
    }
}

/// A shaped, typed array as read from a container.
#[derive(Clone, Debug, PartialEq)]
pub struct RawArray {
    shape: Shape,
    data: ArrayData,
}

impl RawArray {
    /// Wrap `data` with the given shape.
    ///
    /// Returns `Err(ShapeError::ElementCount)` if the buffer length is not
    /// the product of the shape.
    pub fn new(shape: &[usize], data: ArrayData) -> Result<Self, ShapeError> {
        let expected = element_count(shape);
        if data.len() != expected {
            return Err(ShapeError::ElementCount {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            data,
        })
    }

    /// The array's dimensions.
    pub fn dims(&self) -> &[usize] {
        &self.shape
    }

    /// The typed element buffer.
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// The buffer as bytes, if the array holds `u8`.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            ArrayData::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Cast to a dense `f32` tensor of the same shape.
    pub fn to_tensor(&self) -> Tensor {
        Tensor::from_parts(self.shape.clone(), self.data.to_f32_vec())
    }
}

/// A container of named parallel arrays (one training-example file).
///
/// Implementations are expected to be cheap to construct; arrays are
/// read when requested.
pub trait ArraySource {
    /// Human-readable label for logs and errors (usually a path).
    fn name(&self) -> &str;

    /// Read the array stored under `key`.
    fn array(&self, key: &str) -> Result<RawArray, SourceError>;
}

/// In-memory [`ArraySource`] preserving insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryArrays {
    name: String,
    arrays: IndexMap<String, RawArray>,
}

impl MemoryArrays {
    /// An empty container with the given label.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arrays: IndexMap::new(),
        }
    }

    /// Store `array` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, array: RawArray) {
        self.arrays.insert(key.into(), array);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, array: RawArray) -> Self {
        self.insert(key, array);
        self
    }

    /// Stored keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }
}

impl ArraySource for MemoryArrays {
    fn name(&self) -> &str {
        &self.name
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        self.arrays
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::MissingArray {
                name: key.to_string(),
            })
    }
}

impl<S: ArraySource + ?Sized> ArraySource for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        (**self).array(key)
    }
}

impl<S: ArraySource + ?Sized> ArraySource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn array(&self, key: &str) -> Result<RawArray, SourceError> {
        (**self).array(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_array_rejects_wrong_length() {
        let err = RawArray::new(&[2, 2], ArrayData::I16(vec![1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            ShapeError::ElementCount {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn to_tensor_casts_integers() {
        let raw = RawArray::new(&[1, 3], ArrayData::I8(vec![-1, 0, 7])).unwrap();
        let t = raw.to_tensor();
        assert_eq!(t.dims(), &[1, 3]);
        assert_eq!(t.as_slice(), &[-1.0, 0.0, 7.0]);
    }

    #[test]
    fn to_tensor_keeps_shape_of_empty_and_wide_arrays() {
        let empty = RawArray::new(&[0, 3], ArrayData::U8(Vec::new())).unwrap();
        assert_eq!(empty.to_tensor().dims(), &[0, 3]);

        let wide = RawArray::new(&[2, 2], ArrayData::F64(vec![0.5, 1.5, -2.0, 1e300])).unwrap();
        let t = wide.to_tensor();
        assert_eq!(t.get(&[1, 0]), Some(-2.0));
        assert_eq!(t.get(&[1, 1]), Some(f32::INFINITY));
    }

    #[test]
    fn as_u8_only_for_bytes() {
        let bytes = RawArray::new(&[2], ArrayData::U8(vec![1, 2])).unwrap();
        let floats = RawArray::new(&[2], ArrayData::F32(vec![1.0, 2.0])).unwrap();
        assert_eq!(bytes.as_u8(), Some(&[1u8, 2][..]));
        assert!(floats.as_u8().is_none());
        assert_eq!(floats.data().dtype_name(), "f32");
    }

    #[test]
    fn memory_arrays_lookup_and_missing() {
        let src = MemoryArrays::new("mem").with(
            keys::GLOBAL_INPUT,
            RawArray::new(&[1, 1], ArrayData::F32(vec![0.5])).unwrap(),
        );
        assert_eq!(src.name(), "mem");
        assert!(src.array(keys::GLOBAL_INPUT).is_ok());
        match src.array(keys::VALUE_TARGETS) {
            Err(SourceError::MissingArray { name }) => assert_eq!(name, keys::VALUE_TARGETS),
            other => panic!("expected MissingArray, got {other:?}"),
        }
        assert_eq!(src.keys().collect::<Vec<_>>(), vec![keys::GLOBAL_INPUT]);
    }

    #[test]
    fn borrowed_source_delegates() {
        let src = MemoryArrays::new("mem");
        let by_ref: &dyn ArraySource = &src;
        assert_eq!(ArraySource::name(&by_ref), "mem");
    }
}
