// ============================================================
// Layer 4 — Windowed Shuffle Buffer
// ============================================================
// A streaming shuffle that never holds more than `capacity`
// items. While the buffer is filling nothing comes out; once it
// is full, each new item evicts a uniformly chosen resident.
// At end-of-input the residents are drained in random order.
//
// This is NOT a uniform permutation of the whole file: an item
// can only move about `capacity` positions away from where it
// was read. Source files are far larger than the window, so
// nearby lines still tend to land in nearby batches.

use rand::Rng;

#[derive(Debug)]
pub struct ShuffleBuffer<T> {
    capacity: usize,
    items:    Vec<T>,
}

impl<T> ShuffleBuffer<T> {
    /// A capacity of 0 or 1 passes items straight through.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Offer an item; returns the one evicted to make room, if any.
    pub fn push<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) -> Option<T> {
        if self.capacity <= 1 {
            return Some(item);
        }
        if self.items.len() < self.capacity {
            self.items.push(item);
            return None;
        }
        let i = rng.gen_range(0..self.items.len());
        Some(std::mem::replace(&mut self.items[i], item))
    }

    /// Remove a uniformly chosen resident. Used to drain at end-of-input.
    pub fn pop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.items.len());
        Some(self.items.swap_remove(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(capacity: usize, n: usize, seed: u64) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut buf = ShuffleBuffer::new(capacity);
        let mut out = Vec::new();
        for i in 0..n {
            out.extend(buf.push(i, &mut rng));
        }
        while let Some(i) = buf.pop(&mut rng) {
            out.push(i);
        }
        out
    }

    #[test]
    fn test_every_item_comes_out_once() {
        let mut out = run(16, 500, 9);
        out.sort_unstable();
        assert_eq!(out, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_nothing_emitted_while_filling() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut buf = ShuffleBuffer::new(4);
        for i in 0..4 {
            assert!(buf.push(i, &mut rng).is_none());
        }
        assert_eq!(buf.len(), 4);
        assert!(buf.push(4, &mut rng).is_some());
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_order_is_randomised() {
        let out = run(64, 1000, 1);
        assert_ne!(out, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_items_cannot_jump_ahead_of_the_window() {
        // An item read at position i cannot be emitted before
        // output slot i - capacity.
        let capacity = 32;
        let out = run(capacity, 2000, 4);
        for (slot, &item) in out.iter().enumerate() {
            assert!(item <= slot + capacity, "item {item} at slot {slot}");
        }
    }

    #[test]
    fn test_unit_capacity_passes_through() {
        assert_eq!(run(1, 10, 3), (0..10).collect::<Vec<_>>());
        assert_eq!(run(0, 10, 3), (0..10).collect::<Vec<_>>());
    }
}
