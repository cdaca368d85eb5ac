//! Model-side configuration consumed by the pipeline.
//!
//! The pipeline never builds a model. It only needs the input feature
//! counts the model expects ([`InputFeatures`]) and where the
//! side-relative planes live inside the binary input ([`FeatureLayout`]).

use std::ops::Range;

use crate::error::ConfigError;

/// Feature counts a model expects on its two inputs.
pub trait InputFeatures {
    /// Number of binary spatial input planes (`C` of `binaryInputNCHW`).
    fn num_bin_input_features(&self) -> usize;

    /// Number of global input features (`G` of `globalInputNC`).
    fn num_global_input_features(&self) -> usize;
}

/// Location of the side-relative features inside the model inputs.
///
/// `own` and `opponent` are equal-length, disjoint plane ranges of the
/// binary input. `side_to_move` indexes a global feature holding 0 or 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    /// Planes describing the moving side's pieces.
    pub own: Range<usize>,
    /// Planes describing the opponent's pieces.
    pub opponent: Range<usize>,
    /// Global feature index of the side-to-move indicator.
    pub side_to_move: usize,
}

impl Default for FeatureLayout {
    /// Plane 0 is the on-board mask, 1..12 own pieces, 12..23 opponent
    /// pieces; global 0 is the side to move.
    fn default() -> Self {
        Self {
            own: 1..12,
            opponent: 12..23,
            side_to_move: 0,
        }
    }
}

impl FeatureLayout {
    /// Check the layout against the model's feature counts.
    pub fn validate(&self, num_bin: usize, num_global: usize) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidFeatureLayout { reason });

        if self.own.start > self.own.end || self.opponent.start > self.opponent.end {
            return invalid(format!(
                "reversed plane range: own {:?}, opponent {:?}",
                self.own, self.opponent
            ));
        }
        if self.own.len() != self.opponent.len() {
            return invalid(format!(
                "own planes {:?} and opponent planes {:?} differ in length",
                self.own, self.opponent
            ));
        }
        if self.own.start < self.opponent.end && self.opponent.start < self.own.end {
            return invalid(format!(
                "own planes {:?} overlap opponent planes {:?}",
                self.own, self.opponent
            ));
        }
        if self.own.end > num_bin || self.opponent.end > num_bin {
            return invalid(format!(
                "plane ranges {:?}/{:?} exceed {num_bin} binary features",
                self.own, self.opponent
            ));
        }
        if self.side_to_move >= num_global {
            return invalid(format!(
                "side-to-move index {} out of range for {num_global} global features",
                self.side_to_move
            ));
        }
        Ok(())
    }
}

/// Input-side description of a model.
///
/// # Examples
///
/// ```
/// use tessel_core::{InputFeatures, ModelConfig};
///
/// let config = ModelConfig::default();
/// assert_eq!(config.num_bin_input_features(), 25);
/// assert_eq!(config.num_global_input_features(), 19);
/// config.validate().unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    /// Binary spatial input planes.
    pub num_bin_input_features: usize,
    /// Global input features.
    pub num_global_input_features: usize,
    /// Side-relative feature layout.
    pub layout: FeatureLayout,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_bin_input_features: 25,
            num_global_input_features: 19,
            layout: FeatureLayout::default(),
        }
    }
}

impl ModelConfig {
    /// Check that the layout fits the feature counts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout
            .validate(self.num_bin_input_features, self.num_global_input_features)
    }
}

impl InputFeatures for ModelConfig {
    fn num_bin_input_features(&self) -> usize {
        self.num_bin_input_features
    }

    fn num_global_input_features(&self) -> usize {
        self.num_global_input_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(own: Range<usize>, opponent: Range<usize>, side_to_move: usize) -> FeatureLayout {
        FeatureLayout {
            own,
            opponent,
            side_to_move,
        }
    }

    #[test]
    fn default_layout_validates() {
        ModelConfig::default().validate().unwrap();
    }

    #[test]
    fn unequal_ranges_rejected() {
        let err = layout(1..4, 4..6, 0).validate(8, 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFeatureLayout { .. }));
        assert!(err.to_string().contains("differ in length"));
    }

    #[test]
    fn overlapping_ranges_rejected() {
        let err = layout(1..4, 3..6, 0).validate(8, 1).unwrap_err();
        assert!(err.to_string().contains("overlap"), "got: {err}");
    }

    #[test]
    fn adjacent_ranges_accepted() {
        layout(0..3, 3..6, 0).validate(6, 1).unwrap();
    }

    #[test]
    fn out_of_range_planes_rejected() {
        let err = layout(1..4, 4..7, 0).validate(6, 1).unwrap_err();
        assert!(err.to_string().contains("exceed"), "got: {err}");
    }

    #[test]
    fn out_of_range_side_to_move_rejected() {
        let err = layout(0..1, 1..2, 3).validate(2, 3).unwrap_err();
        assert!(err.to_string().contains("side-to-move"), "got: {err}");
    }
}
