use crate::{config::BatchConfig, gain::Gain};
use anyhow::{Context, Result};
use audio_utils::AudioCodec;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug)]
pub enum FileOutcome {
    Processed {
        source: PathBuf,
        destination: PathBuf,
    },
    Failed {
        source: PathBuf,
        error: anyhow::Error,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Processed { source, .. } | FileOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, FileOutcome::Processed { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_processed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.processed_count()
    }
}

/// Applies one gain to every matching file of `work_dir`, one file at a time.
pub struct BatchGainApplier<C> {
    work_dir: PathBuf,
    codec: C,
    config: BatchConfig,
}

impl<C: AudioCodec> BatchGainApplier<C> {
    pub fn new(work_dir: impl Into<PathBuf>, codec: C, config: BatchConfig) -> Self {
        Self {
            work_dir: work_dir.into(),
            codec,
            config,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.work_dir.join(&self.config.output_dir)
    }

    pub fn prepare_output_dir(&self) -> Result<PathBuf> {
        let output_dir = self.output_dir();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        Ok(output_dir)
    }

    /// Names of the matching non-directory entries, in directory listing order.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.work_dir)
            .with_context(|| format!("Failed to list {}", self.work_dir.display()))?;

        let mut files = vec![];
        for entry in entries {
            let entry = entry?;
            let name = PathBuf::from(entry.file_name());

            if !self.config.matches(&name.to_string_lossy()) {
                log::debug!("skip non-matching entry: {}", name.display());
                continue;
            }

            // Unreadable entries such as dangling symlinks are kept so they
            // get reported as failures.
            if entry.path().is_dir() {
                log::debug!("skip directory: {}", name.display());
                continue;
            }

            files.push(name);
        }

        Ok(files)
    }

    pub fn process_file(&self, name: &Path, gain: Gain) -> Result<PathBuf> {
        let source = self.work_dir.join(name);
        let bytes =
            fs::read(&source).with_context(|| format!("Failed to read {}", source.display()))?;

        let audio = self.codec.decode(&bytes)?;
        let audio = self.codec.apply_gain(audio, gain.db())?;
        let encoded = self.codec.encode(&audio)?;

        let destination = self.output_dir().join(name);
        fs::write(&destination, encoded)
            .with_context(|| format!("Failed to write {}", destination.display()))?;

        Ok(destination)
    }

    /// Run the whole batch, writing one line per file and a final summary
    /// line to `console`. Only setup failures are returned as errors.
    pub fn run<W: Write>(&self, gain: Gain, console: &mut W) -> Result<BatchReport> {
        self.prepare_output_dir()?;
        let files = self.scan()?;

        log::info!(
            "applying {gain} to {} file(s) in {}",
            files.len(),
            self.work_dir.display()
        );

        let mut report = BatchReport::default();
        for source in files {
            match self.process_file(&source, gain) {
                Ok(_) => {
                    let destination = self.config.output_dir.join(&source);
                    writeln!(
                        console,
                        "Processed: {} -> {}",
                        source.display(),
                        destination.display()
                    )?;
                    report.outcomes.push(FileOutcome::Processed {
                        source,
                        destination,
                    });
                }
                Err(e) => {
                    log::warn!("process {} failed: {e:?}", source.display());
                    writeln!(console, "Failed to process {}: {e:#}", source.display())?;
                    report.outcomes.push(FileOutcome::Failed { source, error: e });
                }
            }
        }

        writeln!(
            console,
            "All {} files processed.",
            self.config.extension.trim_start_matches('.').to_uppercase()
        )?;

        log::info!(
            "batch finished: {} processed, {} failed",
            report.processed_count(),
            report.failed_count()
        );

        Ok(report)
    }
}
