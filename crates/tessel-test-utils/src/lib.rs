//! Synthetic training files and fixtures for Tessel development.
//!
//! [`ExampleFileBuilder`] produces an in-memory training file whose
//! contents are a known function of `(example, channel, cell)`, so tests
//! can tell exactly which examples a batch holds and how they were
//! transformed. The [`fixtures`] module holds [`ArraySource`] wrappers
//! for failure and access-count testing.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use tessel_core::{keys, ArrayData, ArraySource, MemoryArrays, ModelConfig, RawArray, Tensor};
use tessel_decode::{pack_bits_msb, packed_row_width};

pub use fixtures::{CountingSource, FailingSource};

/// Global feature holding the example's index within its file.
pub const EXAMPLE_ID_FEATURE: usize = 1;

/// A tensor whose flat element `i` is `i`.
pub fn iota(dims: &[usize]) -> Tensor {
    Tensor::from_fn(dims, |i| i as f32)
}

/// The synthetic bit for `(example, channel, cell)`.
pub fn binary_bit(example: usize, channel: usize, cell: usize) -> bool {
    (example * 7 + channel * 3 + cell) % (channel % 3 + 2) == 0
}

/// The synthetic global feature `g` of `example`.
///
/// Feature 0 alternates 0/1 (side to move), feature 1 is the example
/// index, the rest are constant per feature.
pub fn global_feature(example: usize, g: usize) -> f32 {
    match g {
        0 => (example % 2) as f32,
        EXAMPLE_ID_FEATURE => example as f32,
        _ => g as f32 * 0.5,
    }
}

/// Example indices of a `(N, G)` global-input tensor, in row order.
pub fn example_ids(global: &Tensor) -> Vec<usize> {
    let width = global.row_len();
    global
        .as_slice()
        .chunks_exact(width)
        .map(|row| row[EXAMPLE_ID_FEATURE] as usize)
        .collect()
}

/// Builder for a synthetic six-array training file.
///
/// Defaults: 5x5 board, feature counts of [`ModelConfig::default`],
/// two policy channels, four global targets, a six-bin score
/// distribution and one value-target channel.
#[derive(Clone, Debug)]
pub struct ExampleFileBuilder {
    name: String,
    num_examples: usize,
    pos_len: usize,
    num_bin: usize,
    num_global: usize,
    policy_channels: usize,
    global_targets: usize,
    score_len: usize,
    value_channels: usize,
    omit: Vec<&'static str>,
}

impl ExampleFileBuilder {
    pub fn new(name: impl Into<String>, num_examples: usize) -> Self {
        let model = ModelConfig::default();
        Self {
            name: name.into(),
            num_examples,
            pos_len: 5,
            num_bin: model.num_bin_input_features,
            num_global: model.num_global_input_features,
            policy_channels: 2,
            global_targets: 4,
            score_len: 6,
            value_channels: 1,
            omit: Vec::new(),
        }
    }

    pub fn pos_len(mut self, pos_len: usize) -> Self {
        self.pos_len = pos_len;
        self
    }

    /// Binary-plane and global-feature counts.
    pub fn features(mut self, num_bin: usize, num_global: usize) -> Self {
        self.num_bin = num_bin;
        self.num_global = num_global;
        self
    }

    pub fn value_channels(mut self, channels: usize) -> Self {
        self.value_channels = channels;
        self
    }

    /// Leave `key` out of the built file.
    pub fn without(mut self, key: &'static str) -> Self {
        self.omit.push(key);
        self
    }

    fn cells(&self) -> usize {
        self.pos_len * self.pos_len
    }

    /// The packed binary input as written by the external packer.
    pub fn packed_binary(&self) -> RawArray {
        let cells = self.cells();
        let width = packed_row_width(cells);
        let mut bytes = Vec::with_capacity(self.num_examples * self.num_bin * width);
        for e in 0..self.num_examples {
            for c in 0..self.num_bin {
                let plane: Vec<f32> = (0..cells)
                    .map(|i| if binary_bit(e, c, i) { 1.0 } else { 0.0 })
                    .collect();
                bytes.extend(pack_bits_msb(&plane));
            }
        }
        raw(&[self.num_examples, self.num_bin, width], ArrayData::U8(bytes))
    }

    /// The binary input as the decoder should produce it.
    pub fn dense_binary(&self) -> Tensor {
        let cells = self.cells();
        let per_example = self.num_bin * cells;
        Tensor::from_fn(&[self.num_examples, self.num_bin, self.pos_len, self.pos_len], |i| {
            let (e, rest) = (i / per_example, i % per_example);
            if binary_bit(e, rest / cells, rest % cells) { 1.0 } else { 0.0 }
        })
    }

    pub fn global_input(&self) -> Tensor {
        let g = self.num_global;
        Tensor::from_fn(&[self.num_examples, g], |i| global_feature(i / g, i % g))
    }

    pub fn policy_targets(&self) -> Tensor {
        iota(&[self.num_examples, self.policy_channels, self.cells() + 1])
    }

    pub fn global_targets(&self) -> Tensor {
        iota(&[self.num_examples, self.global_targets])
    }

    pub fn score_distribution(&self) -> Tensor {
        iota(&[self.num_examples, self.score_len])
    }

    pub fn value_targets(&self) -> Tensor {
        iota(&[self.num_examples, self.value_channels, self.pos_len, self.pos_len])
    }

    pub fn build(&self) -> MemoryArrays {
        let arrays = [
            (keys::BINARY_INPUT, self.packed_binary()),
            (keys::GLOBAL_INPUT, from_tensor(self.global_input())),
            (keys::POLICY_TARGETS, from_tensor(self.policy_targets())),
            (keys::GLOBAL_TARGETS, from_tensor(self.global_targets())),
            (keys::SCORE_DISTRIBUTION, from_tensor(self.score_distribution())),
            (keys::VALUE_TARGETS, from_tensor(self.value_targets())),
        ];
        let mut file = MemoryArrays::new(self.name.clone());
        for (key, array) in arrays {
            if !self.omit.contains(&key) {
                file.insert(key, array);
            }
        }
        file
    }
}

fn raw(dims: &[usize], data: ArrayData) -> RawArray {
    match RawArray::new(dims, data) {
        Ok(array) => array,
        Err(e) => panic!("synthetic array does not fit {dims:?}: {e}"),
    }
}

fn from_tensor(t: Tensor) -> RawArray {
    let dims = t.dims().to_vec();
    raw(&dims, ArrayData::F32(t.into_vec()))
}

/// Read `key` from `source` as a dense tensor.
pub fn dense(source: &dyn ArraySource, key: &str) -> Tensor {
    match source.array(key) {
        Ok(array) => array.to_tensor(),
        Err(e) => panic!("{}: {e}", source.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_file_has_six_consistent_arrays() {
        let file = ExampleFileBuilder::new("synthetic", 10).build();
        assert_eq!(file.keys().collect::<Vec<_>>(), keys::ALL.to_vec());
        for key in keys::ALL {
            assert_eq!(file.array(key).unwrap().dims()[0], 10, "{key}");
        }
        assert_eq!(file.array(keys::BINARY_INPUT).unwrap().dims(), &[10, 25, 4]);
        assert_eq!(file.array(keys::POLICY_TARGETS).unwrap().dims(), &[10, 2, 26]);
    }

    #[test]
    fn example_ids_recoverable() {
        let b = ExampleFileBuilder::new("ids", 4);
        assert_eq!(example_ids(&b.global_input()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn without_drops_key() {
        let file = ExampleFileBuilder::new("partial", 2)
            .without(keys::SCORE_DISTRIBUTION)
            .build();
        assert!(file.array(keys::SCORE_DISTRIBUTION).is_err());
    }
}
