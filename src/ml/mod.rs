// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The network itself lives outside this crate. What lives here
// is the contract it must satisfy and the loop that feeds it:
//
//   model.rs    — TrainingModel / EvaluationModel traits and
//                 the per-step outcome they report
//
//   dry_run.rs  — a stand-in model that measures batches
//                 instead of learning from them; lets the whole
//                 pipeline run end to end without a GPU
//
//   trainer.rs  — the iteration loop: pull, train, and every
//                 `eval_steps` save → restore → evaluate
//
// Reference: Burn Book §5 (Training)

/// Collaborator contracts for the external seq2seq network
pub mod model;

/// Batch-measuring stand-in model
pub mod dry_run;

/// Train / evaluate schedule over two batch sources
pub mod trainer;
