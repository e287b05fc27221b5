// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training loop never talks to files or manifests directly.
// It asks a `BatchSource` for the next batch and lets the source
// worry about end-of-file and picking the next project.
//
// Implementations:
//   - SourceRotation → rotates through a manifest of .java files
//   - (tests)         → scripted sources that count pulls
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use anyhow::Result;

use crate::domain::example::PaddedBatch;

// ─── BatchSource ──────────────────────────────────────────────────────────────
/// Anything that can hand out padded batches forever.
pub trait BatchSource {
    /// Return the next complete batch.
    ///
    /// End-of-file is handled inside the source (rotate and retry);
    /// an `Err` here means the run cannot continue.
    fn pull(&mut self) -> Result<PaddedBatch>;

    /// The file the most recent batch was read from, if any
    fn current_source(&self) -> Option<&Path>;

    /// How many times the source has been (re)opened so far
    fn rotations(&self) -> usize;
}
