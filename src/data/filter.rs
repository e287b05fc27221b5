// ============================================================
// Layer 4 — Line Filter
// ============================================================
// Decides which raw lines ever reach the corruptor.
//
// A line is kept when, after trimming surrounding whitespace,
// it is non-empty and strictly shorter than `max_length`
// characters. Blank lines and very long lines (generated code,
// minified literals) are dropped from the stream entirely.

pub struct LineFilter {
    /// Exclusive upper bound on the trimmed length, in characters
    max_length: usize,
}

impl LineFilter {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn accept(&self, line: &str) -> bool {
        let length = line.trim().chars().count();
        length > 0 && length < self.max_length
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_blank() {
        let f = LineFilter::new(200);
        assert!(!f.accept(""));
        assert!(!f.accept("   "));
        assert!(!f.accept("\t\r"));
    }

    #[test]
    fn test_length_bound_is_exclusive() {
        let f = LineFilter::new(200);
        assert!(f.accept(&"x".repeat(199)));
        assert!(!f.accept(&"x".repeat(200)));
    }

    #[test]
    fn test_length_is_measured_after_trimming() {
        let f = LineFilter::new(5);
        // 4 visible characters wrapped in lots of indentation
        assert!(f.accept("            abcd   "));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let f = LineFilter::new(3);
        // two characters, four bytes
        assert!(f.accept("éé"));
    }
}
