//! Stream augmented batches from `.npy` training files.
//!
//! Writes three synthetic `.npz` files to a temporary directory, then reads them
//! back as two workers would, printing each batch's provenance.
//! Run with `RUST_LOG=debug` to see per-batch tracing events.

use tessel::prelude::*;
use tessel_test_utils::ExampleFileBuilder;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Tessel Batch Streaming Example ===\n");

    let tmp = tempfile::tempdir()?;
    for (i, n) in [70, 40, 9].into_iter().enumerate() {
        let file = ExampleFileBuilder::new(format!("selfplay-{i}"), n).pos_len(9).build();
        NpzFile::create(tmp.path().join(format!("selfplay-{i:03}.npz")), &file, keys::ALL)?;
    }

    let world_size = 2;
    for rank in 0..world_size {
        println!("--- rank {rank} of {world_size} ---");
        let config = PipelineConfig {
            batch_size: 8,
            world_size,
            rank,
            pos_len: 9,
            randomize_symmetries: true,
            seed: None,
        };
        let files = discover(tmp.path())?;
        let mut reader = TrainingReader::new(config, ModelConfig::default(), Cpu, files)?;

        for batch in reader.by_ref() {
            let batch = batch?;
            let info = &batch.info;
            let file = info.source.rsplit('/').next().unwrap_or_default();
            println!(
                "  {file} step {:>2}: examples {:>2}..{:<2} symmetry {} binary {:?}",
                info.step,
                info.range.start,
                info.range.end,
                info.symmetry,
                batch.binary_input.dims(),
            );
        }

        let stats = reader.stats();
        println!(
            "  {} files, {} too small, {} batches\n",
            stats.files_loaded, stats.files_empty, stats.batches
        );
    }

    Ok(())
}
