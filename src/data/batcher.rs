// ============================================================
// Layer 4 — Seq2Seq Tensor Batcher
// ============================================================
// Converts padded batches into Burn integer tensors for the
// model collaborator.
//
// Shapes (N = batch size):
//   encoder_input   [N, T_enc]   right-padded with PAD
//   encoder_length  [N, 1]
//   decoder_input   [N, T_dec]   right-padded with PAD
//   decoder_output  [N, T_dec]   right-padded with PAD
//   decoder_length  [N, 1]
//
// Lengths get a trailing unit dimension so every field is rank
// 2; they are never padded.
//
// Also implements Burn's `Batcher` trait so the same conversion
// plugs into a Burn `DataLoader` over in-memory examples.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::domain::example::{CharCode, Example, PaddedBatch};

// ─── Seq2SeqBatch ─────────────────────────────────────────────────────────────
/// One batch on the device, ready for an encoder/decoder model.
#[derive(Debug, Clone)]
pub struct Seq2SeqBatch<B: Backend> {
    pub encoder_input:  Tensor<B, 2, Int>,
    pub encoder_length: Tensor<B, 2, Int>,
    pub decoder_input:  Tensor<B, 2, Int>,
    pub decoder_output: Tensor<B, 2, Int>,
    pub decoder_length: Tensor<B, 2, Int>,
}

// ─── Seq2SeqBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Copy, Debug)]
pub struct Seq2SeqBatcher {
    /// Used when padding raw examples through the `Batcher` trait
    pub pad_id: CharCode,
}

impl Seq2SeqBatcher {
    pub fn new(pad_id: CharCode) -> Self {
        Self { pad_id }
    }

    /// Move an already padded batch onto `device`.
    pub fn tensors<B: Backend>(&self, batch: &PaddedBatch, device: &B::Device) -> Seq2SeqBatch<B> {
        Seq2SeqBatch {
            encoder_input:  rows_to_tensor(&batch.encoder_input, device),
            encoder_length: column_to_tensor(&batch.encoder_length, device),
            decoder_input:  rows_to_tensor(&batch.decoder_input, device),
            decoder_output: rows_to_tensor(&batch.decoder_output, device),
            decoder_length: column_to_tensor(&batch.decoder_length, device),
        }
    }
}

impl<B: Backend> Batcher<B, Example, Seq2SeqBatch<B>> for Seq2SeqBatcher {
    fn batch(&self, items: Vec<Example>, device: &B::Device) -> Seq2SeqBatch<B> {
        let padded = PaddedBatch::from_examples(&items, self.pad_id);
        self.tensors(&padded, device)
    }
}

/// Flatten equal-length rows and reshape to [rows, width].
fn rows_to_tensor<B: Backend>(rows: &[Vec<CharCode>], device: &B::Device) -> Tensor<B, 2, Int> {
    let width = rows.first().map_or(0, Vec::len);
    let flat: Vec<i64> = rows
        .iter()
        .flat_map(|row| row.iter().map(|&c| c as i64))
        .collect();
    let data = TensorData::new(flat, [rows.len(), width]).convert::<B::IntElem>();
    Tensor::<B, 2, Int>::from_data(data, device)
}

/// A column of scalars as [len, 1].
fn column_to_tensor<B: Backend>(values: &[u32], device: &B::Device) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = values.iter().map(|&v| v as i64).collect();
    let data = TensorData::new(flat, [values.len(), 1]).convert::<B::IntElem>();
    Tensor::<B, 2, Int>::from_data(data, device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn example(noisy: &str, clean: &str) -> Example {
        let noisy: Vec<CharCode> = noisy.chars().map(|c| c as CharCode).collect();
        let clean: Vec<CharCode> = clean.chars().map(|c| c as CharCode).collect();
        let mut dec_in = vec![2];
        dec_in.extend_from_slice(&clean);
        let mut dec_out = clean;
        dec_out.push(3);
        Example {
            encoder_length: noisy.len(),
            encoder_input:  noisy,
            decoder_length: dec_in.len(),
            decoder_input:  dec_in,
            decoder_output: dec_out,
        }
    }

    fn values(t: Tensor<TestBackend, 2, Int>) -> Vec<i64> {
        t.into_data().convert::<i64>().to_vec::<i64>().unwrap()
    }

    #[test]
    fn test_tensor_shapes() {
        let device  = <TestBackend as Backend>::Device::default();
        let batcher = Seq2SeqBatcher::new(128);
        let batch: Seq2SeqBatch<TestBackend> = batcher.batch(
            vec![example("ab", "abc"), example("wxyz", "w")],
            &device,
        );

        assert_eq!(batch.encoder_input.dims(), [2, 4]);
        assert_eq!(batch.decoder_input.dims(), [2, 4]);
        assert_eq!(batch.decoder_output.dims(), [2, 4]);
        assert_eq!(batch.encoder_length.dims(), [2, 1]);
        assert_eq!(batch.decoder_length.dims(), [2, 1]);
    }

    #[test]
    fn test_tensor_values_keep_row_order_and_padding() {
        let device  = <TestBackend as Backend>::Device::default();
        let batcher = Seq2SeqBatcher::new(128);
        let padded  = PaddedBatch::from_examples(
            &[example("a", "ab"), example("xy", "x")],
            128,
        );
        let batch: Seq2SeqBatch<TestBackend> = batcher.tensors(&padded, &device);

        assert_eq!(values(batch.encoder_input), vec![97, 128, 120, 121]);
        assert_eq!(values(batch.decoder_output), vec![97, 98, 3, 120, 3, 128]);
        assert_eq!(values(batch.decoder_length), vec![3, 2]);
        assert_eq!(values(batch.encoder_length), vec![1, 2]);
    }
}
