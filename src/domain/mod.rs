// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   example.rs — one training example and one padded batch
//   traits.rs  — the seam between the training loop and
//                whatever produces batches
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O, NO randomness
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Example / PaddedBatch and the CharCode alias
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;
