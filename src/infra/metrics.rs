// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per side at every evaluation step.
//
// Output file: <output_directory>/metrics.csv
//
//   step,split,source,rotations,tokens,padding_ratio,loss
//   1000,train,/data/guava.java,14,9812,0.412000,
//   1000,eval,/data/junit.java,2,10344,0.380000,
//
// `rotations` is how many files that side has opened so far;
// `loss` is empty when the model collaborator reports none.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::ml::model::StepOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Eval,
}

impl Split {
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Eval  => "eval",
        }
    }
}

/// One row of the metrics CSV
#[derive(Debug, Clone)]
pub struct StepMetrics {
    pub step:      usize,
    pub split:     Split,
    pub source:    String,
    pub rotations: usize,
    pub outcome:   StepOutcome,
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "step,split,source,rotations,tokens,padding_ratio,loss")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &StepMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        let loss = m
            .outcome
            .loss
            .map(|l| format!("{l:.6}"))
            .unwrap_or_default();

        // Paths never contain commas in practice; quote just in case
        let source = if m.source.contains(',') {
            format!("\"{}\"", m.source.replace('"', "\"\""))
        } else {
            m.source.clone()
        };

        writeln!(
            f,
            "{},{},{},{},{},{:.6},{}",
            m.step,
            m.split.as_str(),
            source,
            m.rotations,
            m.outcome.tokens,
            m.outcome.padding_ratio,
            loss,
        )?;

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
