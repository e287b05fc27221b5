// ============================================================
// Layer 4 — Source Rotation Controller
// ============================================================
// Training runs far longer than any single source file. Each
// time the current file runs out, the controller:
//
//   1. re-reads the manifest (one project name per line)
//   2. picks a name uniformly at random
//   3. resolves it to <data_directory>/<name>.java
//   4. opens a fresh LineStream, dropping the old one
//
// and retries the pull. The training and evaluation sides each
// own a controller with their own manifest and generator.
//
// A project with fewer eligible lines than one batch exhausts
// without serving anything, so a run of unlucky picks is normal
// and the controller keeps rotating until a batch comes out. A
// warning is logged every `EMPTY_ROTATION_WARNING` empty files in
// a row, so a manifest where EVERY project is too small shows up
// in the logs. An optional `max_rotations` cap turns that case
// into `NoCompleteBatch` instead. Only files that served nothing
// count against it; a file that ran dry after serving batches is
// ordinary end of epoch.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::ThreadPool;

use crate::data::error::{PipelineError, Result};
use crate::data::stream::{LineStream, Pull, StreamConfig};
use crate::domain::example::PaddedBatch;
use crate::domain::traits::BatchSource;

/// Extension appended to every manifest entry.
pub const SOURCE_EXTENSION: &str = "java";

/// Empty files in a row between two "nothing fills a batch" warnings.
pub const EMPTY_ROTATION_WARNING: usize = 100;

/// `<data_directory>/<project>.java`
pub fn resolve_source(data_directory: &Path, project: &str) -> PathBuf {
    data_directory.join(format!("{project}.{SOURCE_EXTENSION}"))
}

/// Read a manifest: one project per line, blank lines ignored.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| PipelineError::ManifestUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let projects: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if projects.is_empty() {
        return Err(PipelineError::ManifestEmpty { path: path.to_path_buf() });
    }
    Ok(projects)
}

pub struct SourceRotation {
    data_directory: PathBuf,
    manifest:       PathBuf,
    config:         StreamConfig,
    pool:           Arc<ThreadPool>,
    rng:            StdRng,
    stream:         Option<LineStream>,
    rotations:      usize,
    /// Give up after this many empty files in a row; `None` never gives up
    max_rotations:  Option<usize>,
}

impl SourceRotation {
    /// Nothing is opened yet; call `reinitialize` (or just `pull`).
    ///
    /// `manifest` is resolved against `data_directory` when relative.
    /// A cap of `Some(0)` is treated as `Some(1)`.
    pub fn new(
        data_directory: impl Into<PathBuf>,
        manifest:       impl AsRef<Path>,
        config:         StreamConfig,
        max_rotations:  Option<usize>,
        rng:            StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let data_directory = data_directory.into();
        let manifest = data_directory.join(manifest.as_ref());
        let pool = config.worker_pool()?;

        Ok(Self {
            data_directory,
            manifest,
            config,
            pool,
            rng,
            stream: None,
            rotations: 0,
            max_rotations: max_rotations.map(|cap| cap.max(1)),
        })
    }

    /// Pick a project uniformly from the manifest and resolve its path.
    pub fn choose_source(&mut self) -> Result<PathBuf> {
        let projects = read_manifest(&self.manifest)?;
        let project = projects
            .choose(&mut self.rng)
            .ok_or_else(|| PipelineError::ManifestEmpty { path: self.manifest.clone() })?;
        Ok(resolve_source(&self.data_directory, project))
    }

    /// Replace the current stream with one over a freshly chosen file.
    pub fn reinitialize(&mut self) -> Result<&Path> {
        let source = self.choose_source()?;
        let seed = self.rng.gen::<u64>();

        // Drop the old stream first so its producer stops reading
        if let Some(old) = self.stream.take() {
            tracing::debug!(
                "Leaving '{}' after {} batches",
                old.path().display(),
                old.served()
            );
        }
        let stream = LineStream::open(&source, &self.config, Arc::clone(&self.pool), seed)?;
        self.rotations += 1;

        tracing::info!(
            "Rotation {} on '{}': now reading '{}'",
            self.rotations,
            self.manifest.display(),
            source.display()
        );

        Ok(self.stream.insert(stream).path())
    }

    /// Pull a batch, rotating to a new file whenever the current
    /// one is exhausted.
    pub fn next_batch(&mut self) -> Result<PaddedBatch> {
        let mut empty_files = 0usize;
        loop {
            let Some(stream) = self.stream.as_mut() else {
                self.reinitialize()?;
                continue;
            };

            match stream.next()? {
                Pull::Batch(batch) => return Ok(batch),
                Pull::Exhausted => {
                    if stream.served() == 0 {
                        empty_files += 1;
                        if self.max_rotations.is_some_and(|cap| empty_files >= cap) {
                            return Err(PipelineError::NoCompleteBatch {
                                manifest: self.manifest.clone(),
                                attempts: empty_files,
                            });
                        }
                        if empty_files % EMPTY_ROTATION_WARNING == 0 {
                            tracing::warn!(
                                "{} files in a row from '{}' held fewer than {} eligible lines",
                                empty_files,
                                self.manifest.display(),
                                self.config.batch_size
                            );
                        }
                    }
                    self.reinitialize()?;
                }
            }
        }
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }
}

impl BatchSource for SourceRotation {
    fn pull(&mut self) -> anyhow::Result<PaddedBatch> {
        Ok(self.next_batch()?)
    }

    fn current_source(&self) -> Option<&Path> {
        self.stream.as_ref().map(LineStream::path)
    }

    fn rotations(&self) -> usize {
        self.rotations
    }
}
