//! Occurrence counts of confirmed positions, for draw-by-repetition.
//!
//! Every confirmed turn adds its digest. Un-executing that turn removes it
//! again, so speculative search moves never leave a trace here.

use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatedPositions {
    counts: FxHashMap<u64, u32>,
    /// (move number, digest) in insertion order.
    entries: Vec<(u32, u64)>,
}

impl RepeatedPositions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `digest` as reached by move `move_number`. Returns how many
    /// times it has now occurred.
    pub fn add(&mut self, digest: u64, move_number: u32) -> u32 {
        self.entries.push((move_number, digest));
        let count = self.counts.entry(digest).or_insert(0);
        *count += 1;
        *count
    }

    /// Remove everything recorded by moves numbered `move_number` or later.
    pub fn remove_since(&mut self, move_number: u32) {
        while let Some(&(n, d)) = self.entries.last() {
            if n < move_number {
                break;
            }
            self.entries.pop();
            self.decrement(d);
        }
    }

    fn decrement(&mut self, digest: u64) {
        if let Some(c) = self.counts.get_mut(&digest) {
            *c -= 1;
            if *c == 0 {
                self.counts.remove(&digest);
            }
        }
    }

    #[must_use]
    pub fn count(&self, digest: u64) -> u32 {
        self.counts.get(&digest).copied().unwrap_or(0)
    }

    /// Number of recorded positions, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
    }
}
