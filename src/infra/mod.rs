// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file handling for a training run:
//
//   run_dir.rs  — the output directory: created up front,
//                 holds run_config.json so a run can be
//                 reproduced or resumed with the same knobs
//
//   metrics.rs  — per-evaluation CSV log of which file each
//                 side was reading and how full its batches were
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Rust Book §12 (I/O and File Handling)

/// Output directory and saved run configuration
pub mod run_dir;

/// Metrics CSV logger
pub mod metrics;
