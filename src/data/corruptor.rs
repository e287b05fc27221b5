// ============================================================
// Layer 4 — Line Corruptor
// ============================================================
// Produces the noisy encoder side of an example by simulating
// the mistakes people make while typing code:
//
//   1. drop one bracket        ( ) [ ] { }
//   2. drop one semicolon      ;
//   3. swap two neighbouring characters
//
// Each edit fires independently with probability 10% and only
// while the line is longer than one character. Edits run in
// that order, each on the output of the previous one, so a
// line can lose a bracket AND a semicolon AND get a transposition.
//
// All randomness comes from the caller's generator: the same
// seed always yields the same corruption.
//
// Reference: rand crate documentation (Rng, SliceRandom)

use rand::seq::SliceRandom;
use rand::Rng;

/// An edit fires when a uniform draw in [0, 1) exceeds this.
pub const TRIGGER_THRESHOLD: f64 = 0.9;

pub const BRACKETS: [char; 6] = ['(', ')', '[', ']', '{', '}'];

/// Trim `line` and apply the three randomized edits.
pub fn corrupt<R: Rng + ?Sized>(line: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = line.trim().chars().collect();

    // The draw happens before the length check so every call
    // consumes the same number of gate draws.
    if triggered(rng) && chars.len() > 1 {
        drop_one_matching(&mut chars, |c| BRACKETS.contains(&c), rng);
    }

    if triggered(rng) && chars.len() > 1 {
        drop_one_matching(&mut chars, |c| c == ';', rng);
    }

    if triggered(rng) && chars.len() > 1 {
        let i = rng.gen_range(0..chars.len() - 1);
        chars.swap(i, i + 1);
    }

    chars.into_iter().collect()
}

fn triggered<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen::<f64>() > TRIGGER_THRESHOLD
}

/// Remove one character chosen uniformly among those matching
/// `pred`. No-op when nothing matches.
fn drop_one_matching<R, F>(chars: &mut Vec<char>, pred: F, rng: &mut R)
where
    R: Rng + ?Sized,
    F: Fn(char) -> bool,
{
    let positions: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, &c)| pred(c))
        .map(|(i, _)| i)
        .collect();

    if let Some(&i) = positions.choose(rng) {
        chars.remove(i);
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(s: &str) -> Vec<char> {
        let mut v: Vec<char> = s.chars().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_never_triggering_only_trims() {
        // Every draw is 0.0, so no gate ever opens
        let mut rng = StepRng::new(0, 0);
        assert_eq!(corrupt("   foo(bar);  ", &mut rng), "foo(bar);");
    }

    #[test]
    fn test_single_character_is_never_edited() {
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(corrupt("  ;  ", &mut rng), ";");
            assert_eq!(corrupt("{", &mut rng), "{");
        }
    }

    #[test]
    fn test_seeded_corruption_is_reproducible() {
        let line = "for (int i = 0; i < n; i++) { total += xs[i]; }";
        let a: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..50).map(|_| corrupt(line, &mut rng)).collect()
        };
        let b: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..50).map(|_| corrupt(line, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_only_brackets_and_semicolons_are_removed() {
        let line = "if (a[i] > 0) { b = c; d(); }";
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let out = corrupt(line, &mut rng);
            let removed = line.chars().count() - out.chars().count();
            assert!(removed <= 2, "removed {removed} chars: {out}");

            // Every non-bracket, non-semicolon character survives
            let keep = |c: &char| !BRACKETS.contains(c) && *c != ';';
            let before: Vec<char> = sorted(line).into_iter().filter(keep).collect();
            let after:  Vec<char> = sorted(&out).into_iter().filter(keep).collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_plain_text_is_at_most_transposed() {
        let line = "return total";
        let mut rng = StdRng::seed_from_u64(3);
        let mut changed = 0;
        for _ in 0..2000 {
            let out = corrupt(line, &mut rng);
            assert_eq!(sorted(&out), sorted(line));
            if out != line {
                changed += 1;
            }
        }
        // ~10% of calls transpose; no two neighbours are equal here
        assert!(changed > 100 && changed < 400, "changed = {changed}");
    }

    #[test]
    fn test_edits_fire_roughly_one_time_in_ten() {
        let line = "a;";
        let mut rng = StdRng::seed_from_u64(5);
        let dropped = (0..10_000)
            .filter(|_| corrupt(line, &mut rng).chars().count() == 1)
            .count();
        // Only the semicolon edit can shorten "a;": expect ~1000
        assert!(dropped > 800 && dropped < 1200, "dropped = {dropped}");
    }
}
