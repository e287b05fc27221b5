// ============================================================
// Layer 4 — Sequence Builder
// ============================================================
// Turns one raw line into one `Example`:
//
//   clean   = trim(line)
//   encoder = encode(corrupt(line))
//   dec_in  = [SOS] + encode(clean)
//   dec_out = encode(clean) + [EOS]
//
// The decoder pair is the same sequence shifted by one, which
// is what teacher forcing needs. The only side effect is the
// randomness consumed by the corruptor.

use rand::Rng;

use crate::data::codec::CharCodec;
use crate::data::corruptor::corrupt;
use crate::domain::example::Example;

#[derive(Debug, Clone, Copy)]
pub struct SequenceBuilder {
    codec: CharCodec,
}

impl SequenceBuilder {
    pub fn new(codec: CharCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &CharCodec {
        &self.codec
    }

    pub fn build<R: Rng + ?Sized>(&self, line: &str, rng: &mut R) -> Example {
        let clean_codes = self.codec.encode(line.trim());

        let encoder_input = self.codec.encode(&corrupt(line, rng));

        let mut decoder_input = Vec::with_capacity(clean_codes.len() + 1);
        decoder_input.push(self.codec.sos_id);
        decoder_input.extend_from_slice(&clean_codes);

        let mut decoder_output = clean_codes;
        decoder_output.push(self.codec.eos_id);

        Example {
            encoder_length: encoder_input.len(),
            decoder_length: decoder_input.len(),
            encoder_input,
            decoder_input,
            decoder_output,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decoder_framing_holds_for_every_seed() {
        let builder = SequenceBuilder::new(CharCodec::default());
        let line    = "    System.out.println(\"hi\");";
        let clean   = line.trim().chars().count();

        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ex = builder.build(line, &mut rng);

            assert_eq!(ex.decoder_input[0], 2);
            assert_eq!(*ex.decoder_output.last().unwrap(), 3);
            assert_eq!(ex.decoder_input.len(), clean + 1);
            assert_eq!(ex.decoder_output.len(), clean + 1);
            assert_eq!(ex.decoder_length, clean + 1);
            assert_eq!(ex.encoder_length, ex.encoder_input.len());
            assert!(ex.encoder_length <= clean);
            assert_eq!(&ex.decoder_input[1..], &ex.decoder_output[..clean]);
        }
    }

    #[test]
    fn test_uncorrupted_encoder_matches_clean_line() {
        let builder = SequenceBuilder::new(CharCodec::default());
        let mut rng = StepRng::new(0, 0);
        let ex = builder.build("  x++;  ", &mut rng);
        assert_eq!(ex.encoder_input, vec![120, 43, 43, 59]);
        assert_eq!(ex.decoder_input, vec![2, 120, 43, 43, 59]);
        assert_eq!(ex.decoder_output, vec![120, 43, 43, 59, 3]);
    }

    #[test]
    fn test_empty_line_still_framed() {
        let builder = SequenceBuilder::new(CharCodec::new(0, 7, 9));
        let mut rng = StdRng::seed_from_u64(1);
        let ex = builder.build("   ", &mut rng);
        assert_eq!(ex.decoder_input, vec![7]);
        assert_eq!(ex.decoder_output, vec![9]);
        assert_eq!(ex.decoder_length, 1);
        assert!(ex.encoder_input.is_empty());
        assert_eq!(ex.encoder_length, 0);
    }
}
