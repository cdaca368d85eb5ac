//! Benchmark profiles for the Tessel training-data pipeline.
//!
//! Provides pre-built synthetic training files and reader configurations:
//!
//! - [`reference_profile`]: 1024 examples on a 13x13 board
//! - [`stress_profile`]: 1024 examples on a 19x19 board
//! - [`reader_config`]: a single-worker config with augmentation on

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tessel_pipeline::PipelineConfig;
use tessel_test_utils::ExampleFileBuilder;

/// Examples per profile file.
pub const PROFILE_EXAMPLES: usize = 1024;

/// Batch size used by [`reader_config`].
pub const PROFILE_BATCH: usize = 256;

/// Build the reference file: 13x13 board, default feature counts.
pub fn reference_profile() -> ExampleFileBuilder {
    ExampleFileBuilder::new("reference", PROFILE_EXAMPLES).pos_len(13)
}

/// Build the stress file: 19x19 board, default feature counts.
pub fn stress_profile() -> ExampleFileBuilder {
    ExampleFileBuilder::new("stress", PROFILE_EXAMPLES).pos_len(19)
}

/// Single-worker reader config with a fixed augmentation seed.
pub fn reader_config(pos_len: usize) -> PipelineConfig {
    PipelineConfig {
        batch_size: PROFILE_BATCH,
        pos_len,
        randomize_symmetries: true,
        seed: Some(42),
        ..PipelineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::ModelConfig;
    use tessel_pipeline::DecodedFile;

    #[test]
    fn reference_profile_loads() {
        let file = DecodedFile::load(&reference_profile().build(), 13, &ModelConfig::default())
            .unwrap();
        assert_eq!(file.len(), PROFILE_EXAMPLES);
    }

    #[test]
    fn stress_profile_loads() {
        let file = DecodedFile::load(&stress_profile().build(), 19, &ModelConfig::default())
            .unwrap();
        assert_eq!(file.len(), PROFILE_EXAMPLES);
    }

    #[test]
    fn reader_config_validates() {
        reader_config(13).validate().unwrap();
    }
}
