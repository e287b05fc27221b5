// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user-facing goal.
//
// Rules for this layer:
//   - No tensor math (Layer 5)
//   - No printing (Layer 1)
//   - No direct line parsing or file reading (Layer 4 / 6)
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Show what the corruptor does to a project's lines
pub mod preview_use_case;
