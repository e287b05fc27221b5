// ============================================================
// Layer 6 — Run Directory
// ============================================================
// The output directory holds everything a run writes:
//
//   <output_directory>/
//     run_config.json     ← TrainConfig, written before step 1
//     metrics.csv         ← see metrics.rs
//     dry_run-1000.json   ← collaborator checkpoints
//     ...
//
// Unlike the data directory, the output directory is created
// when missing. Failing to create it stops the run before any
// training iteration executes.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;

const CONFIG_FILE: &str = "run_config.json";

pub struct RunDirectory {
    dir: PathBuf,
}

impl RunDirectory {
    /// Create the directory (like `mkdir -p`) and wrap it.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<PathBuf> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(path)
    }
}
