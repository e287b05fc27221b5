// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Wires the pipeline to the model collaborators in order:
//
//   Step 1: Check the data directory       (fail before training)
//   Step 2: Create the output directory    (Layer 6 - infra)
//   Step 3: Save the run config            (Layer 6 - infra)
//   Step 4: Build train + eval rotations   (Layer 4 - data)
//   Step 5: Open the first file for each   (fail before training)
//   Step 6: Run the iteration schedule     (Layer 5 - ml)
//
// Both manifests are opened up front: a missing project file or
// unreadable manifest halts the run before step 1 executes.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    batcher::Seq2SeqBatcher,
    codec::CharCodec,
    rotation::SourceRotation,
    stream::StreamConfig,
};
use crate::infra::{metrics::MetricsLogger, run_dir::RunDirectory};
use crate::ml::{
    dry_run::DryRunModel,
    trainer::{LoopSummary, TrainingLoop},
};

type RunBackend = burn::backend::NdArray;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Saved as run_config.json next to the
// metrics so a run can be reproduced. `num_layers`, `num_units`,
// `max_gradient_norm` and `learning_rate` are not used by the
// pipeline; they are carried for the model collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_directory:      PathBuf,
    pub output_directory:    PathBuf,
    pub train_manifest:      String,
    pub eval_manifest:       String,
    pub max_sequence_length: usize,
    pub pad_id:              u32,
    pub sos_id:              u32,
    pub eos_id:              u32,
    pub batch_size:          usize,
    pub num_layers:          usize,
    pub num_units:           usize,
    pub num_iterations:      usize,
    pub eval_steps:          usize,
    pub max_gradient_norm:   f64,
    pub learning_rate:       f64,
    pub shuffle_buffer_size: usize,
    pub num_workers:         usize,
    pub seed:                Option<u64>,
    pub max_rotations:       Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_directory:      PathBuf::from("data"),
            output_directory:    PathBuf::from("runs"),
            train_manifest:      "trainJava.csv".to_string(),
            eval_manifest:       "testJava.csv".to_string(),
            max_sequence_length: 200,
            pad_id:              128,
            sos_id:              2,
            eos_id:              3,
            batch_size:          128,
            num_layers:          2,
            num_units:           256,
            num_iterations:      12_000,
            eval_steps:          1_000,
            max_gradient_norm:   5.0,
            learning_rate:       0.001,
            shuffle_buffer_size: 10_000,
            num_workers:         4,
            seed:                None,
            max_rotations:       None,
        }
    }
}

impl TrainConfig {
    pub fn codec(&self) -> CharCodec {
        CharCodec::new(self.pad_id, self.sos_id, self.eos_id)
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            batch_size:          self.batch_size,
            max_sequence_length: self.max_sequence_length,
            shuffle_buffer_size: self.shuffle_buffer_size,
            num_workers:         self.num_workers,
            codec:               self.codec(),
        }
    }

    /// Root generator: seeded when `seed` is set, OS entropy otherwise.
    pub fn root_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<LoopSummary> {
        let cfg = &self.config;

        // ── Step 1: Data directory must already exist ────────────────────────
        if !cfg.data_directory.is_dir() {
            bail!(
                "Data directory '{}' does not exist",
                cfg.data_directory.display()
            );
        }

        // ── Step 2 + 3: Output directory and saved config ────────────────────
        let run_dir = RunDirectory::create(&cfg.output_directory)?;
        run_dir.save_config(cfg)?;
        let metrics = MetricsLogger::new(run_dir.path())?;

        // ── Step 4: Independent rotations for train and eval ─────────────────
        // Each side gets its own generator split off the root, so the
        // eval side's picks never perturb the training sequence.
        let mut root = cfg.root_rng();
        let stream_config = cfg.stream_config();

        let mut train_source = SourceRotation::new(
            &cfg.data_directory,
            &cfg.train_manifest,
            stream_config.clone(),
            cfg.max_rotations,
            StdRng::seed_from_u64(root.gen()),
        )
        .context("Cannot set up the training stream")?;

        let mut eval_source = SourceRotation::new(
            &cfg.data_directory,
            &cfg.eval_manifest,
            stream_config,
            cfg.max_rotations,
            StdRng::seed_from_u64(root.gen()),
        )
        .context("Cannot set up the evaluation stream")?;

        // ── Step 5: First file for each side ─────────────────────────────────
        for source in [&mut train_source, &mut eval_source] {
            let manifest = source.manifest().to_path_buf();
            source
                .reinitialize()
                .with_context(|| format!("Cannot open '{}'", manifest.display()))?;
        }

        // ── Step 6: Iteration schedule ───────────────────────────────────────
        let mut train_model = DryRunModel::new();
        let mut eval_model  = DryRunModel::new();

        let schedule = TrainingLoop::<RunBackend> {
            num_iterations: cfg.num_iterations,
            eval_steps:     cfg.eval_steps,
            batcher:        Seq2SeqBatcher::new(cfg.pad_id),
            device:         Default::default(),
            output_dir:     run_dir.path(),
            metrics:        &metrics,
        };

        let summary = schedule.run(
            &mut train_source,
            &mut eval_source,
            &mut train_model,
            &mut eval_model,
        )?;

        tracing::info!(
            "Finished {} steps ({} evaluations); train side opened {} files, eval side {}",
            summary.train_steps,
            summary.eval_runs,
            summary.train_rotations,
            summary.eval_rotations,
        );
        tracing::info!(
            "Dry run saw {} train batches ({} tokens) and {} eval batches; last restore from {}",
            train_model.batches(),
            train_model.tokens(),
            eval_model.batches(),
            eval_model
                .restored_from()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "nowhere".to_string()),
        );
        tracing::info!("Metrics written to '{}'", metrics.csv_path().display());

        Ok(summary)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_project(dir: &Path, name: &str, lines: usize) {
        let body: String = (0..lines)
            .map(|i| format!("    {name}.run({i});\n"))
            .collect();
        fs::write(dir.join(format!("{name}.java")), body).unwrap();
    }

    fn config(data: &Path, out: &Path) -> TrainConfig {
        TrainConfig {
            data_directory:      data.to_path_buf(),
            output_directory:    out.to_path_buf(),
            batch_size:          8,
            num_iterations:      12,
            eval_steps:          4,
            shuffle_buffer_size: 16,
            num_workers:         2,
            seed:                Some(1234),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_full_run_rotates_both_sides() {
        let data = tempfile::tempdir().unwrap();
        let out  = tempfile::tempdir().unwrap();
        write_project(data.path(), "A", 10);
        write_project(data.path(), "B", 17);
        write_project(data.path(), "C", 9);
        fs::write(data.path().join("trainJava.csv"), "A\nB\n").unwrap();
        fs::write(data.path().join("testJava.csv"), "C\n").unwrap();

        let run_out = out.path().join("run");
        let summary = TrainUseCase::new(config(data.path(), &run_out))
            .execute()
            .unwrap();

        assert_eq!(summary.train_steps, 12);
        assert_eq!(summary.eval_runs, 3);
        // At most two batches per training file, so the train side rotated
        assert!(summary.train_rotations >= 6);
        // C holds one batch: every evaluation after the first rotates
        assert_eq!(summary.eval_rotations, 3);

        assert!(run_out.join("run_config.json").exists());
        let csv = fs::read_to_string(run_out.join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 1 + 2 * 3);
    }

    #[test]
    fn test_missing_data_directory_fails_before_output_is_created() {
        let out = tempfile::tempdir().unwrap();
        let run_out = out.path().join("run");
        let cfg = config(Path::new("/definitely/not/here"), &run_out);

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!run_out.exists());
    }

    #[test]
    fn test_missing_manifest_halts_before_training() {
        let data = tempfile::tempdir().unwrap();
        let out  = tempfile::tempdir().unwrap();
        write_project(data.path(), "A", 10);
        fs::write(data.path().join("trainJava.csv"), "A\n").unwrap();

        let err = TrainUseCase::new(config(data.path(), out.path()))
            .execute()
            .unwrap_err();
        assert!(format!("{err:#}").contains("testJava.csv"));

        // Nothing was trained, so no checkpoints exist
        assert!(!out.path().join("dry_run-4.json").exists());
    }

    #[test]
    fn test_stream_config_follows_train_config() {
        let cfg = TrainConfig {
            pad_id: 0,
            batch_size: 7,
            ..TrainConfig::default()
        };
        let sc = cfg.stream_config();
        assert_eq!(sc.batch_size, 7);
        assert_eq!(sc.codec.pad_id, 0);
        assert_eq!(sc.codec.sos_id, 2);
        assert_eq!(sc.max_sequence_length, 200);
    }
}
