//! One training file, decoded and validated.

use std::ops::Range;
use std::sync::Arc;

use tessel_core::{keys, ArraySource, InputFeatures, ShapeError, Tensor};
use tessel_decode::{decode_binary_input, validate_feature_counts};
use tessel_symmetry::Symmetry;

use crate::batch::{Batch, BatchInfo};
use crate::error::PipelineError;

/// The six arrays of a training file as dense tensors.
///
/// Built once per file. Every array shares the leading example axis and
/// every spatial array has `pos_len x pos_len` trailing axes.
#[derive(Clone, Debug)]
pub struct DecodedFile {
    name: Arc<str>,
    binary_input: Tensor,
    global_input: Tensor,
    policy_targets: Tensor,
    global_targets: Tensor,
    score_distribution: Tensor,
    value_targets: Tensor,
}

impl DecodedFile {
    /// Read, decode and validate every array of `source`.
    pub fn load(
        source: &dyn ArraySource,
        pos_len: usize,
        features: &dyn InputFeatures,
    ) -> Result<DecodedFile, PipelineError> {
        let name = source.name();
        let read = |key: &str| source.array(key).map_err(PipelineError::source_in(name));

        let packed = read(keys::BINARY_INPUT)?;
        let binary_input =
            decode_binary_input(&packed, pos_len).map_err(PipelineError::shape_in(name))?;
        let file = DecodedFile {
            name: Arc::from(name),
            binary_input,
            global_input: read(keys::GLOBAL_INPUT)?.to_tensor(),
            policy_targets: read(keys::POLICY_TARGETS)?.to_tensor(),
            global_targets: read(keys::GLOBAL_TARGETS)?.to_tensor(),
            score_distribution: read(keys::SCORE_DISTRIBUTION)?.to_tensor(),
            value_targets: read(keys::VALUE_TARGETS)?.to_tensor(),
        };
        file.validate(pos_len, features)
            .map_err(PipelineError::shape_in(name))?;
        Ok(file)
    }

    fn validate(&self, pos_len: usize, features: &dyn InputFeatures) -> Result<(), ShapeError> {
        validate_feature_counts(&self.binary_input, &self.global_input, features)?;
        let n = self.len();

        let expect = |array: &'static str, t: &Tensor, rank: usize| {
            if t.rank() != rank {
                return Err(ShapeError::Rank {
                    array,
                    expected: rank,
                    actual: t.rank(),
                });
            }
            if t.leading_dim() != n {
                return Err(ShapeError::LeadingDim {
                    array,
                    expected: n,
                    actual: t.leading_dim(),
                });
            }
            Ok(())
        };
        expect(keys::GLOBAL_INPUT, &self.global_input, 2)?;
        expect(keys::POLICY_TARGETS, &self.policy_targets, 3)?;
        expect(keys::GLOBAL_TARGETS, &self.global_targets, 2)?;
        expect(keys::SCORE_DISTRIBUTION, &self.score_distribution, 2)?;
        expect(keys::VALUE_TARGETS, &self.value_targets, 4)?;

        let policy_len = self.policy_targets.dims()[2];
        if policy_len != pos_len * pos_len + 1 {
            return Err(ShapeError::PolicyLength {
                expected: pos_len * pos_len + 1,
                actual: policy_len,
            });
        }
        let (rows, cols) = (self.value_targets.dims()[2], self.value_targets.dims()[3]);
        if rows != cols {
            return Err(ShapeError::NonSquare { rows, cols });
        }
        if rows != pos_len {
            return Err(ShapeError::BoardSize {
                array: keys::VALUE_TARGETS,
                expected: pos_len,
                actual: rows,
            });
        }
        Ok(())
    }

    /// The source's name.
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Examples in the file.
    pub fn len(&self) -> usize {
        self.binary_input.leading_dim()
    }

    /// Whether the file holds no examples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out `range` of every array as an untransformed batch.
    ///
    /// # Panics
    ///
    /// Panics if `range` exceeds [`len`](Self::len).
    pub fn slice(&self, step: usize, range: Range<usize>) -> Batch {
        Batch {
            binary_input: self.binary_input.slice_leading(range.clone()),
            global_input: self.global_input.slice_leading(range.clone()),
            policy_targets: self.policy_targets.slice_leading(range.clone()),
            global_targets: self.global_targets.slice_leading(range.clone()),
            score_distribution: self.score_distribution.slice_leading(range.clone()),
            value_targets: self.value_targets.slice_leading(range.clone()),
            info: BatchInfo {
                source: Arc::clone(&self.name),
                step,
                range,
                symmetry: Symmetry::Identity,
            },
        }
    }
}
