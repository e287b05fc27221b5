// ============================================================
// Layer 5 — Model Collaborator Contracts
// ============================================================
// The encoder/decoder network, its optimiser and its checkpoint
// format are supplied from outside. The training loop only needs
// these two traits.
//
// Training and evaluation are separate objects, mirroring two
// separate graphs: the evaluation model only sees weights that
// went through `save` → `restore`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use burn::prelude::Backend;

use crate::data::batcher::Seq2SeqBatch;

/// What one train or eval step reports back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Model loss, when the collaborator computes one
    pub loss: Option<f64>,

    /// Non-padding decoder positions in the batch
    pub tokens: usize,

    /// Share of decoder positions that were padding, in [0, 1]
    pub padding_ratio: f64,
}

pub trait TrainingModel<B: Backend> {
    /// One optimisation step. `step` starts at 1.
    fn train(&mut self, batch: Seq2SeqBatch<B>, step: usize) -> Result<StepOutcome>;

    /// Persist the current weights; returns what `restore` accepts.
    fn save(&self, output_dir: &Path, step: usize) -> Result<PathBuf>;
}

pub trait EvaluationModel<B: Backend> {
    fn restore(&mut self, checkpoint: &Path) -> Result<()>;

    fn eval(&mut self, batch: Seq2SeqBatch<B>) -> Result<StepOutcome>;
}
