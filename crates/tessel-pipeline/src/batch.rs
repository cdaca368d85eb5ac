//! The batch record handed to a training step.

use std::ops::Range;
use std::sync::Arc;

use tessel_core::{keys, FeatureLayout, ShapeError, Tensor};
use tessel_symmetry::{apply, apply_policy, swap_sides, Symmetry};

use crate::device::Device;

/// Where a batch came from and how it was transformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchInfo {
    /// Name of the source file.
    pub source: Arc<str>,
    /// Step index within the file.
    pub step: usize,
    /// Example range within the file.
    pub range: Range<usize>,
    /// Symmetry applied to the spatial tensors.
    pub symmetry: Symmetry,
}

/// Six parallel tensors sharing a leading example axis.
///
/// `binary_input` is `(N, C, L, L)`, `global_input` is `(N, G)`,
/// `policy_targets` is `(N, P, L*L + 1)`, `global_targets` is `(N, T)`,
/// `score_distribution` is `(N, S)` and `value_targets` is
/// `(N, V, L, L)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    /// Decoded binary spatial features.
    pub binary_input: Tensor,
    /// Global (non-spatial) features.
    pub global_input: Tensor,
    /// Policy targets, board cells then the pass slot.
    pub policy_targets: Tensor,
    /// Global scalar targets.
    pub global_targets: Tensor,
    /// Score distribution targets.
    pub score_distribution: Tensor,
    /// Spatial value targets.
    pub value_targets: Tensor,
    /// Provenance.
    pub info: BatchInfo,
}

impl Batch {
    /// Examples in the batch.
    pub fn len(&self) -> usize {
        self.binary_input.leading_dim()
    }

    /// Whether the batch holds no examples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a tensor by its canonical file key.
    pub fn tensor(&self, key: &str) -> Option<&Tensor> {
        Some(match key {
            keys::BINARY_INPUT => &self.binary_input,
            keys::GLOBAL_INPUT => &self.global_input,
            keys::POLICY_TARGETS => &self.policy_targets,
            keys::GLOBAL_TARGETS => &self.global_targets,
            keys::SCORE_DISTRIBUTION => &self.score_distribution,
            keys::VALUE_TARGETS => &self.value_targets,
            _ => return None,
        })
    }

    /// All six tensors with their canonical keys, in [`keys::ALL`] order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, &Tensor)> {
        [
            &self.binary_input,
            &self.global_input,
            &self.policy_targets,
            &self.global_targets,
            &self.score_distribution,
            &self.value_targets,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, t)| (keys::ALL[i], t))
    }

    /// Move every tensor to `device`.
    pub fn to_device<D: Device + ?Sized>(self, device: &D) -> Batch {
        Batch {
            binary_input: device.transfer(self.binary_input),
            global_input: device.transfer(self.global_input),
            policy_targets: device.transfer(self.policy_targets),
            global_targets: device.transfer(self.global_targets),
            score_distribution: device.transfer(self.score_distribution),
            value_targets: device.transfer(self.value_targets),
            info: self.info,
        }
    }

    /// Apply `sym` to the binary input, policy targets and value targets.
    ///
    /// For symmetries that [swap sides](Symmetry::swaps_sides) the own
    /// and opponent planes named by `layout` are exchanged and the
    /// side-to-move feature complemented. Value-target channels are
    /// moved geometrically but never exchanged.
    pub fn apply_symmetry(
        &mut self,
        sym: Symmetry,
        layout: &FeatureLayout,
        pos_len: usize,
    ) -> Result<(), ShapeError> {
        if sym != Symmetry::Identity {
            self.binary_input = apply(&self.binary_input, sym)?;
            self.policy_targets = apply_policy(&self.policy_targets, sym, pos_len)?;
            self.value_targets = apply(&self.value_targets, sym)?;
            if sym.swaps_sides() {
                swap_sides(&mut self.binary_input, &mut self.global_input, layout)?;
            }
        }
        self.info.symmetry = sym;
        Ok(())
    }
}
