// ============================================================
// Layer 5 — Training Loop
// ============================================================
// for step in 1..=num_iterations:
//     batch ← train source   (rotates files on exhaustion)
//     train_model.train(batch)
//     if step % eval_steps == 0:
//         ckpt ← train_model.save(step)
//         eval_model.restore(ckpt)
//         batch ← eval source (rotates independently)
//         eval_model.eval(batch)
//         metrics.csv += train row, eval row
//
// The loop decides nothing about files: exhaustion and rotation
// are hidden behind `BatchSource::pull`. Any error that escapes
// a pull is fatal (missing project file, unreadable manifest,
// every project too small).

use std::path::Path;

use anyhow::{Context, Result};
use burn::prelude::Backend;

use crate::data::batcher::Seq2SeqBatcher;
use crate::domain::traits::BatchSource;
use crate::infra::metrics::{MetricsLogger, Split, StepMetrics};
use crate::ml::model::{EvaluationModel, StepOutcome, TrainingModel};

/// Counters returned when the schedule completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub train_steps:     usize,
    pub eval_runs:       usize,
    pub train_rotations: usize,
    pub eval_rotations:  usize,
    pub train_tokens:    usize,
}

pub struct TrainingLoop<'a, B: Backend> {
    pub num_iterations: usize,
    /// Evaluate every this many steps; 0 disables evaluation
    pub eval_steps:     usize,
    pub batcher:        Seq2SeqBatcher,
    pub device:         B::Device,
    pub output_dir:     &'a Path,
    pub metrics:        &'a MetricsLogger,
}

impl<'a, B: Backend> TrainingLoop<'a, B> {
    pub fn run(
        &self,
        train_source: &mut dyn BatchSource,
        eval_source:  &mut dyn BatchSource,
        train_model:  &mut dyn TrainingModel<B>,
        eval_model:   &mut dyn EvaluationModel<B>,
    ) -> Result<LoopSummary> {
        let mut summary = LoopSummary::default();

        for step in 1..=self.num_iterations {
            let batch = train_source
                .pull()
                .with_context(|| format!("No training batch for step {step}"))?;
            tracing::trace!(
                "Step {step}: {} rows, encoder width {}, decoder width {}",
                batch.len(),
                batch.encoder_width(),
                batch.decoder_width()
            );
            let outcome = train_model.train(self.batcher.tensors(&batch, &self.device), step)?;
            summary.train_steps  += 1;
            summary.train_tokens += outcome.tokens;

            if self.eval_steps == 0 || step % self.eval_steps != 0 {
                continue;
            }

            self.record(step, Split::Train, &*train_source, outcome)?;

            let checkpoint = train_model.save(self.output_dir, step)?;
            eval_model
                .restore(&checkpoint)
                .with_context(|| format!("Cannot restore '{}'", checkpoint.display()))?;

            let batch = eval_source
                .pull()
                .with_context(|| format!("No evaluation batch for step {step}"))?;
            let eval_outcome = eval_model.eval(self.batcher.tensors(&batch, &self.device))?;
            summary.eval_runs += 1;

            self.record(step, Split::Eval, &*eval_source, eval_outcome)?;

            tracing::info!(
                "Step {:>6}/{} | train tokens={} pad={:.1}% | eval tokens={} pad={:.1}%",
                step,
                self.num_iterations,
                outcome.tokens,
                outcome.padding_ratio * 100.0,
                eval_outcome.tokens,
                eval_outcome.padding_ratio * 100.0,
            );
        }

        summary.train_rotations = train_source.rotations();
        summary.eval_rotations  = eval_source.rotations();
        Ok(summary)
    }

    fn record(
        &self,
        step:    usize,
        split:   Split,
        source:  &dyn BatchSource,
        outcome: StepOutcome,
    ) -> Result<()> {
        self.metrics.log(&StepMetrics {
            step,
            split,
            source: source
                .current_source()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            rotations: source.rotations(),
            outcome,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::example::PaddedBatch;
    use crate::ml::dry_run::DryRunModel;
    use burn::backend::NdArray;
    use std::fs;
    use std::path::PathBuf;

    type TestBackend = NdArray;

    /// Hands out the same two-row batch; fails after `limit` pulls.
    struct ScriptedSource {
        path:  PathBuf,
        pulls: usize,
        limit: usize,
    }

    impl ScriptedSource {
        fn new(name: &str, limit: usize) -> Self {
            Self { path: PathBuf::from(name), pulls: 0, limit }
        }
    }

    impl BatchSource for ScriptedSource {
        fn pull(&mut self) -> Result<PaddedBatch> {
            if self.pulls == self.limit {
                anyhow::bail!("source '{}' ran dry", self.path.display());
            }
            self.pulls += 1;
            Ok(PaddedBatch {
                encoder_input:  vec![vec![97, 98], vec![99, 128]],
                encoder_length: vec![2, 1],
                decoder_input:  vec![vec![2, 97, 98], vec![2, 99, 128]],
                decoder_output: vec![vec![97, 98, 3], vec![99, 3, 128]],
                decoder_length: vec![3, 2],
            })
        }

        fn current_source(&self) -> Option<&Path> {
            Some(self.path.as_path())
        }

        fn rotations(&self) -> usize {
            self.pulls / 2
        }
    }

    fn training_loop<'a>(
        iterations: usize,
        eval_steps: usize,
        dir:        &'a Path,
        metrics:    &'a MetricsLogger,
    ) -> TrainingLoop<'a, TestBackend> {
        TrainingLoop {
            num_iterations: iterations,
            eval_steps,
            batcher: Seq2SeqBatcher::new(128),
            device:  Default::default(),
            output_dir: dir,
            metrics,
        }
    }

    #[test]
    fn test_eval_runs_every_eval_steps() {
        let tmp     = tempfile::tempdir().unwrap();
        let metrics = MetricsLogger::new(tmp.path()).unwrap();
        let mut train = ScriptedSource::new("train.java", usize::MAX);
        let mut eval  = ScriptedSource::new("eval.java", usize::MAX);
        let mut train_model = DryRunModel::new();
        let mut eval_model  = DryRunModel::new();

        let summary = training_loop(5, 2, tmp.path(), &metrics)
            .run(&mut train, &mut eval, &mut train_model, &mut eval_model)
            .unwrap();

        assert_eq!(summary.train_steps, 5);
        assert_eq!(summary.eval_runs, 2);
        assert_eq!(summary.train_tokens, 25);
        assert_eq!(train.pulls, 5);
        assert_eq!(eval.pulls, 2);
        assert_eq!(summary.train_rotations, 2);
        assert_eq!(summary.eval_rotations, 1);

        // The evaluator was restored from the most recent save
        let last = tmp.path().join("dry_run-4.json");
        assert!(tmp.path().join("dry_run-2.json").exists());
        assert_eq!(eval_model.restored_from(), Some(last.as_path()));
        assert_eq!(eval_model.batches(), 4);

        let csv = fs::read_to_string(metrics.csv_path()).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("2,train,train.java,"));
        assert!(rows[1].starts_with("2,eval,eval.java,"));
        assert!(rows[3].starts_with("4,eval,eval.java,"));
    }

    #[test]
    fn test_zero_eval_steps_never_evaluates() {
        let tmp     = tempfile::tempdir().unwrap();
        let metrics = MetricsLogger::new(tmp.path()).unwrap();
        let mut train = ScriptedSource::new("train.java", usize::MAX);
        let mut eval  = ScriptedSource::new("eval.java", 0);
        let mut train_model = DryRunModel::new();
        let mut eval_model  = DryRunModel::new();

        let summary = training_loop(3, 0, tmp.path(), &metrics)
            .run(&mut train, &mut eval, &mut train_model, &mut eval_model)
            .unwrap();
        assert_eq!(summary.eval_runs, 0);
        assert_eq!(eval.pulls, 0);
    }

    #[test]
    fn test_source_failure_stops_the_run() {
        let tmp     = tempfile::tempdir().unwrap();
        let metrics = MetricsLogger::new(tmp.path()).unwrap();
        let mut train = ScriptedSource::new("train.java", 2);
        let mut eval  = ScriptedSource::new("eval.java", usize::MAX);
        let mut train_model = DryRunModel::new();
        let mut eval_model  = DryRunModel::new();

        let err = training_loop(10, 100, tmp.path(), &metrics)
            .run(&mut train, &mut eval, &mut train_model, &mut eval_model)
            .unwrap_err();
        assert!(err.to_string().contains("step 3"));
        assert_eq!(train_model.batches(), 2);
    }
}
