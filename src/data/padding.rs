// ============================================================
// Layer 4 — Batch Padding
// ============================================================
// Right-pads every sequence field to the longest row of that
// field within the batch. Padding never goes on the left, and
// each field is padded independently: a batch of short noisy
// lines and long clean lines has two different widths.

use crate::domain::example::{CharCode, Example, PaddedBatch};

impl PaddedBatch {
    pub fn from_examples(examples: &[Example], pad_id: CharCode) -> Self {
        let encoder_width = examples.iter().map(|e| e.encoder_input.len()).max().unwrap_or(0);
        let decoder_width = examples.iter().map(|e| e.decoder_input.len()).max().unwrap_or(0);

        PaddedBatch {
            encoder_input: examples
                .iter()
                .map(|e| pad_right(&e.encoder_input, encoder_width, pad_id))
                .collect(),
            encoder_length: examples.iter().map(|e| e.encoder_length as u32).collect(),
            decoder_input: examples
                .iter()
                .map(|e| pad_right(&e.decoder_input, decoder_width, pad_id))
                .collect(),
            decoder_output: examples
                .iter()
                .map(|e| pad_right(&e.decoder_output, decoder_width, pad_id))
                .collect(),
            decoder_length: examples.iter().map(|e| e.decoder_length as u32).collect(),
        }
    }
}

fn pad_right(codes: &[CharCode], width: usize, pad_id: CharCode) -> Vec<CharCode> {
    let mut row = Vec::with_capacity(width.max(codes.len()));
    row.extend_from_slice(codes);
    row.resize(width.max(codes.len()), pad_id);
    row
}
