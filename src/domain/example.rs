// ============================================================
// Layer 3 — Training Example Types
// ============================================================
// A line of source code becomes one `Example`:
//
//   clean line:     int x = f(a);
//   encoder_input:  int x = fa);        ← corrupted, no framing
//   decoder_input:  <SOS> int x = f(a);
//   decoder_output: int x = f(a); <EOS>
//
// `PaddedBatch` is exactly `batch_size` examples, every
// sequence right-padded to the longest one in the batch.

/// One character, stored as its Unicode scalar value.
/// The reserved PAD / SOS / EOS ids live in the same space.
pub type CharCode = u32;

/// Everything the model needs for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Corrupted line, one code per character
    pub encoder_input: Vec<CharCode>,

    /// Always `encoder_input.len()`
    pub encoder_length: usize,

    /// `[SOS] + clean`
    pub decoder_input: Vec<CharCode>,

    /// `clean + [EOS]`
    pub decoder_output: Vec<CharCode>,

    /// Always `decoder_input.len() == decoder_output.len()`
    pub decoder_length: usize,
}

/// A fixed-size group of examples, right-padded per field.
///
/// Lengths are kept unpadded: the tensor layer reshapes them to
/// `[batch, 1]` so every field has a uniform rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch {
    pub encoder_input:  Vec<Vec<CharCode>>,
    pub encoder_length: Vec<u32>,
    pub decoder_input:  Vec<Vec<CharCode>>,
    pub decoder_output: Vec<Vec<CharCode>>,
    pub decoder_length: Vec<u32>,
}

impl PaddedBatch {
    /// Number of examples in the batch
    pub fn len(&self) -> usize {
        self.encoder_input.len()
    }

    /// Padded width of the encoder rows (0 for an empty batch)
    pub fn encoder_width(&self) -> usize {
        self.encoder_input.first().map_or(0, Vec::len)
    }

    /// Padded width of the decoder rows (0 for an empty batch)
    pub fn decoder_width(&self) -> usize {
        self.decoder_input.first().map_or(0, Vec::len)
    }
}
