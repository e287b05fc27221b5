// ============================================================
// Layer 2 — PreviewUseCase
// ============================================================
// Pulls one batch through the real pipeline and decodes it back
// to text, so you can eyeball what the corruptor does before
// committing to a 12 000-step run:
//
//   clean:     list.add(new Item(a, b));
//   corrupted: list.add(new Itema, b));
//
// Uses the same rotation, filter, shuffle and padding code as
// training; only the batch size differs.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use crate::data::{
    codec::CharCodec,
    rotation::SourceRotation,
    stream::StreamConfig,
};
use crate::domain::traits::BatchSource;

/// Files too small for one preview batch are skipped this many times
const PREVIEW_MAX_ROTATIONS: usize = 256;

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub data_directory:      PathBuf,
    pub manifest:            String,
    pub count:               usize,
    pub max_sequence_length: usize,
    pub codec:               CharCodec,
    pub seed:                Option<u64>,
}

/// One line before and after corruption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPair {
    pub clean:     String,
    pub corrupted: String,
}

pub struct PreviewUseCase {
    config: PreviewConfig,
}

impl PreviewUseCase {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Returns the file the lines came from and the decoded pairs.
    pub fn execute(&self) -> Result<(PathBuf, Vec<PreviewPair>)> {
        let cfg = &self.config;
        if cfg.count == 0 {
            bail!("Preview count must be at least 1");
        }

        let stream_config = StreamConfig {
            batch_size:          cfg.count,
            max_sequence_length: cfg.max_sequence_length,
            num_workers:         1,
            codec:               cfg.codec,
            ..StreamConfig::default()
        };
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut source = SourceRotation::new(
            &cfg.data_directory,
            &cfg.manifest,
            stream_config,
            Some(PREVIEW_MAX_ROTATIONS),
            rng,
        )?;

        let batch = source
            .pull()
            .with_context(|| format!("Cannot preview '{}'", cfg.manifest))?;

        let pairs = batch
            .encoder_input
            .iter()
            .zip(&batch.encoder_length)
            .zip(batch.decoder_output.iter().zip(&batch.decoder_length))
            .map(|((noisy, &noisy_len), (clean, &clean_len))| PreviewPair {
                // Cut by length first: padding may share a code with real text
                clean:     cfg.codec.decode(&clean[..clean_len as usize - 1]),
                corrupted: cfg.codec.decode(&noisy[..noisy_len as usize]),
            })
            .collect();

        let origin = source
            .current_source()
            .map(PathBuf::from)
            .unwrap_or_default();

        Ok((origin, pairs))
    }
}
