// ============================================================
// Layer 4 — Character Codec
// ============================================================
// Maps every character to its Unicode scalar value and back.
// There is no vocabulary: `'a'` is 97, `'{'` is 123, `'é'` is 233.
//
// Three ids are reserved for sequence framing:
//   PAD (default 128) — right padding inside a batch
//   SOS (default 2)   — first decoder input token
//   EOS (default 3)   — last decoder output token
//
// These share the code space with real characters, so a source
// line containing U+0080, U+0002 or U+0003 is indistinguishable
// from framing. Nothing is rewritten; `collides` lets callers
// notice and log it.

use serde::{Deserialize, Serialize};

use crate::domain::example::CharCode;

pub const DEFAULT_PAD_ID: CharCode = 128;
pub const DEFAULT_SOS_ID: CharCode = 2;
pub const DEFAULT_EOS_ID: CharCode = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharCodec {
    pub pad_id: CharCode,
    pub sos_id: CharCode,
    pub eos_id: CharCode,
}

impl CharCodec {
    pub fn new(pad_id: CharCode, sos_id: CharCode, eos_id: CharCode) -> Self {
        Self { pad_id, sos_id, eos_id }
    }

    /// One code per character, in order, nothing inserted.
    pub fn encode(&self, line: &str) -> Vec<CharCode> {
        line.chars().map(|c| c as CharCode).collect()
    }

    /// Turn model output back into text.
    ///
    /// Stops at the first EOS, drops PAD and SOS, and skips codes
    /// that are not valid scalar values.
    pub fn decode(&self, codes: &[CharCode]) -> String {
        codes
            .iter()
            .take_while(|&&c| c != self.eos_id)
            .filter(|&&c| c != self.pad_id && c != self.sos_id)
            .filter_map(|&c| char::from_u32(c))
            .collect()
    }

    pub fn is_reserved(&self, code: CharCode) -> bool {
        code == self.pad_id || code == self.sos_id || code == self.eos_id
    }

    /// True if any real character encodes to a reserved id.
    pub fn collides(&self, codes: &[CharCode]) -> bool {
        codes.iter().any(|&c| self.is_reserved(c))
    }
}

impl Default for CharCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PAD_ID, DEFAULT_SOS_ID, DEFAULT_EOS_ID)
    }
}
