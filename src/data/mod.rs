// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a .java file on disk and a tensor batch.
//
//   manifest (trainJava.csv / testJava.csv)
//       │
//       ▼
//   SourceRotation    → picks a random project, reopens on EOF
//       │
//       ▼
//   LineStream        → read, filter, shuffle, build, pad
//       │   per line:
//       │     LineFilter       → keep 0 < len(trim) < max
//       │     corrupt          → drop bracket / semicolon, swap
//       │     SequenceBuilder  → encoder + SOS/EOS decoder pair
//       │     CharCodec        → chars to codepoints
//       ▼
//   PaddedBatch       → B examples, right-padded
//       │
//       ▼
//   Seq2SeqBatcher    → Burn Int tensors for the model
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Pipeline error taxonomy
pub mod error;

/// Character ↔ codepoint mapping with reserved framing ids
pub mod codec;

/// Blank / over-long line rejection
pub mod filter;

/// Randomised bracket / semicolon / transposition noise
pub mod corruptor;

/// One line → one Example
pub mod builder;

/// Bounded windowed shuffle
pub mod shuffle;

/// Right padding of examples into a PaddedBatch
pub mod padding;

/// Background streaming batcher over one file
pub mod stream;

/// Manifest-driven file rotation on exhaustion
pub mod rotation;

/// Burn tensor conversion
pub mod batcher;
