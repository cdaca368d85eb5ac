//! The lazy batch iterator.

use tessel_core::{ArraySource, ModelConfig};
use tessel_shard::{ShardPlan, WorkerSpec};
use tessel_symmetry::SymmetrySampler;
use tracing::{debug, info, warn};

use crate::batch::Batch;
use crate::config::PipelineConfig;
use crate::device::Device;
use crate::error::PipelineError;
use crate::file::DecodedFile;

/// Counters over the life of a [`TrainingReader`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Files decoded successfully.
    pub files_loaded: u64,
    /// Files that failed to load.
    pub files_failed: u64,
    /// Files too small for a single whole step.
    pub files_empty: u64,
    /// Batches yielded.
    pub batches: u64,
}

struct OpenFile {
    file: DecodedFile,
    plan: ShardPlan,
    next_step: usize,
}

/// Yields this worker's batches from a sequence of training files.
///
/// Each file is read and validated once, then its whole steps are
/// produced in order: slice, transfer to the device, and (if enabled)
/// one random symmetry for the whole batch. Nothing is read until the
/// first call to [`next`](Iterator::next), and the consumer may stop at
/// any point.
///
/// A file that fails to load yields exactly one `Err`; the following
/// call moves on to the next file.
///
/// # Examples
///
/// ```
/// use tessel_core::{MemoryArrays, ModelConfig};
/// use tessel_pipeline::{Cpu, PipelineConfig, TrainingReader};
///
/// let config = PipelineConfig { batch_size: 4, ..PipelineConfig::default() };
/// let files: Vec<MemoryArrays> = Vec::new();
/// let mut reader = TrainingReader::new(config, ModelConfig::default(), Cpu, files).unwrap();
/// assert!(reader.next().is_none());
/// ```
pub struct TrainingReader<I, D> {
    config: PipelineConfig,
    model: ModelConfig,
    spec: WorkerSpec,
    device: D,
    sources: I,
    sampler: Option<SymmetrySampler>,
    current: Option<OpenFile>,
    stats: ReaderStats,
}

impl<I, D> TrainingReader<I, D>
where
    I: Iterator,
    I::Item: ArraySource,
    D: Device,
{
    /// Validate the configuration and set up the reader.
    ///
    /// The symmetry generator is created here, once, and shared by every
    /// file the reader visits.
    pub fn new(
        config: PipelineConfig,
        model: ModelConfig,
        device: D,
        sources: impl IntoIterator<IntoIter = I>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        model.validate()?;
        let spec = config.worker_spec()?;
        let sampler = config.randomize_symmetries.then(|| match config.seed {
            Some(seed) => SymmetrySampler::seeded(seed),
            None => SymmetrySampler::from_entropy(),
        });
        Ok(Self {
            config,
            model,
            spec,
            device,
            sources: sources.into_iter(),
            sampler,
            current: None,
            stats: ReaderStats::default(),
        })
    }

    /// The reader's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Counters so far.
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    fn open(&mut self, source: &dyn ArraySource) -> Result<(), PipelineError> {
        let file = DecodedFile::load(source, self.config.pos_len, &self.model)?;
        let plan = ShardPlan::new(file.len(), self.spec);
        info!(
            source = %file.name(),
            examples = file.len(),
            usable_batches = plan.usable_batches(),
            rank = self.spec.rank(),
            "file opened"
        );
        if plan.whole_steps() == 0 {
            self.stats.files_empty += 1;
            warn!(
                source = %file.name(),
                examples = file.len(),
                step_len = self.spec.step_len(),
                "file smaller than one whole step, skipping"
            );
        }
        self.current = Some(OpenFile {
            file,
            plan,
            next_step: 0,
        });
        Ok(())
    }

    fn produce(&mut self) -> Option<Result<Batch, PipelineError>> {
        let open = self.current.as_mut()?;
        let step = open.next_step;
        let range = open.plan.step_range(step)?;
        open.next_step += 1;

        let mut batch = open.file.slice(step, range).to_device(&self.device);
        if let Some(sampler) = self.sampler.as_mut() {
            let sym = sampler.sample();
            if let Err(e) = batch.apply_symmetry(sym, &self.model.layout, self.config.pos_len) {
                let name = open.file.name().to_string();
                self.current = None;
                return Some(Err(PipelineError::Shape {
                    source_name: name,
                    error: e,
                }));
            }
        }
        debug!(
            source = %batch.info.source,
            step,
            range = ?batch.info.range,
            symmetry = batch.info.symmetry.tag(),
            device = self.device.name(),
            "batch ready"
        );
        self.stats.batches += 1;
        Some(Ok(batch))
    }
}

impl<I, D> Iterator for TrainingReader<I, D>
where
    I: Iterator,
    I::Item: ArraySource,
    D: Device,
{
    type Item = Result<Batch, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(batch) = self.produce() {
                return Some(batch);
            }
            self.current = None;

            let source = self.sources.next()?;
            match self.open(&source) {
                Ok(()) => self.stats.files_loaded += 1,
                Err(e) => {
                    self.stats.files_failed += 1;
                    warn!(
                        source = e.source_name().unwrap_or_default(),
                        error = %e,
                        "file failed to load"
                    );
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<I, D> std::iter::FusedIterator for TrainingReader<I, D>
where
    I: std::iter::FusedIterator,
    I::Item: ArraySource,
    D: Device,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Cpu;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tessel_core::{keys, ConfigError, FeatureLayout};
    use tessel_test_utils::{ExampleFileBuilder, FailingSource};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(run: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn config(batch_size: usize) -> PipelineConfig {
        PipelineConfig {
            batch_size,
            pos_len: 5,
            randomize_symmetries: false,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn bad_config_rejected_before_reading() {
        let files = vec![ExampleFileBuilder::new("a", 8).build()];
        let result = TrainingReader::new(
            PipelineConfig {
                rank: 1,
                ..config(4)
            },
            ModelConfig::default(),
            Cpu,
            files,
        );
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::RankOutOfRange { .. }))
        ));
    }

    #[test]
    fn bad_layout_rejected() {
        let model = ModelConfig {
            layout: FeatureLayout {
                own: 0..3,
                opponent: 3..5,
                side_to_move: 0,
            },
            ..ModelConfig::default()
        };
        let files: Vec<tessel_core::MemoryArrays> = Vec::new();
        assert!(matches!(
            TrainingReader::new(config(4), model, Cpu, files),
            Err(PipelineError::Config(ConfigError::InvalidFeatureLayout { .. }))
        ));
    }

    #[test]
    fn stats_track_files_and_batches() {
        let files = vec![
            ExampleFileBuilder::new("a", 9).build(),
            ExampleFileBuilder::new("tiny", 3).build(),
            ExampleFileBuilder::new("b", 8).build(),
        ];
        let mut reader = TrainingReader::new(config(4), ModelConfig::default(), Cpu, files).unwrap();
        let batches: Vec<Batch> = reader.by_ref().map(Result::unwrap).collect();
        assert_eq!(batches.len(), 4);
        assert_eq!(
            reader.stats(),
            ReaderStats {
                files_loaded: 3,
                files_failed: 0,
                files_empty: 1,
                batches: 4,
            }
        );
        assert!(reader.next().is_none());
    }

    #[test]
    fn file_events_carry_structured_fields() {
        let logs = captured_logs(|| {
            let files: Vec<Box<dyn ArraySource>> = vec![
                Box::new(ExampleFileBuilder::new("full", 8).build()),
                Box::new(ExampleFileBuilder::new("tiny", 3).build()),
                Box::new(FailingSource::new(
                    ExampleFileBuilder::new("bad", 8).build(),
                    keys::VALUE_TARGETS,
                )),
            ];
            let reader = TrainingReader::new(config(4), ModelConfig::default(), Cpu, files).unwrap();
            assert_eq!(reader.filter(Result::is_ok).count(), 2);
        });

        let opened = logs
            .lines()
            .find(|l| l.contains("file opened") && l.contains("source=full"))
            .unwrap_or_else(|| panic!("no open event in:\n{logs}"));
        assert!(opened.contains("usable_batches=2"), "{opened}");
        assert!(opened.contains("rank=0"), "{opened}");
        assert!(opened.contains("examples=8"), "{opened}");

        let skipped = logs
            .lines()
            .find(|l| l.contains("smaller than one whole step"))
            .unwrap_or_else(|| panic!("no skip event in:\n{logs}"));
        assert!(skipped.contains("source=tiny") && skipped.contains("step_len=4"), "{skipped}");

        let failed = logs
            .lines()
            .find(|l| l.contains("file failed to load"))
            .unwrap_or_else(|| panic!("no failure event in:\n{logs}"));
        assert!(failed.contains("source=\"bad\"") || failed.contains("source=bad"), "{failed}");
        assert!(logs.contains("batch ready"));
    }
}
