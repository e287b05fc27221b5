// ============================================================
// Layer 5 — Dry-Run Model
// ============================================================
// Implements both collaborator traits without any weights.
// Each step reports how many real decoder tokens the batch held
// and how much of it was padding, which is exactly what you
// want to look at when tuning batch size and max length.
//
// `save` writes a tiny JSON marker so the save → restore hand-off
// between the training and evaluation sides is exercised too.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::batcher::Seq2SeqBatch;
use crate::ml::model::{EvaluationModel, StepOutcome, TrainingModel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct DryRunCheckpoint {
    step:    usize,
    batches: usize,
    tokens:  usize,
}

#[derive(Debug, Default)]
pub struct DryRunModel {
    batches:       usize,
    tokens:        usize,
    restored_from: Option<PathBuf>,
}

impl DryRunModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }

    pub fn restored_from(&self) -> Option<&Path> {
        self.restored_from.as_deref()
    }
}

impl<B: Backend> TrainingModel<B> for DryRunModel {
    fn train(&mut self, batch: Seq2SeqBatch<B>, _step: usize) -> Result<StepOutcome> {
        let outcome = measure(&batch);
        self.batches += 1;
        self.tokens  += outcome.tokens;
        Ok(outcome)
    }

    fn save(&self, output_dir: &Path, step: usize) -> Result<PathBuf> {
        let path = output_dir.join(format!("dry_run-{step}.json"));
        let checkpoint = DryRunCheckpoint {
            step,
            batches: self.batches,
            tokens:  self.tokens,
        };
        fs::write(&path, serde_json::to_string_pretty(&checkpoint)?)
            .with_context(|| format!("Cannot write checkpoint '{}'", path.display()))?;
        tracing::debug!("Saved dry-run checkpoint '{}'", path.display());
        Ok(path)
    }
}

impl<B: Backend> EvaluationModel<B> for DryRunModel {
    fn restore(&mut self, checkpoint: &Path) -> Result<()> {
        let json = fs::read_to_string(checkpoint)
            .with_context(|| format!("Cannot read checkpoint '{}'", checkpoint.display()))?;
        let saved: DryRunCheckpoint = serde_json::from_str(&json)
            .with_context(|| format!("Malformed checkpoint '{}'", checkpoint.display()))?;

        self.batches       = saved.batches;
        self.tokens        = saved.tokens;
        self.restored_from = Some(checkpoint.to_path_buf());
        Ok(())
    }

    fn eval(&mut self, batch: Seq2SeqBatch<B>) -> Result<StepOutcome> {
        Ok(measure(&batch))
    }
}

/// Count real decoder tokens from the length column, not by
/// comparing against PAD: a source character can share PAD's code.
fn measure<B: Backend>(batch: &Seq2SeqBatch<B>) -> StepOutcome {
    let [rows, width] = batch.decoder_output.dims();
    let tokens = batch
        .decoder_length
        .clone()
        .sum()
        .into_scalar()
        .elem::<i64>()
        .max(0) as usize;

    let slots = rows * width;
    let padding_ratio = if slots > 0 {
        1.0 - tokens as f64 / slots as f64
    } else {
        0.0
    };

    StepOutcome { loss: None, tokens, padding_ratio }
}
