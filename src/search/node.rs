//! Per-node search values.
//!
//! Scores are kept as one value per seat. In a two-player game the vector
//! is always `[v, -v]`, so "each mover maximises its own entry" is plain
//! minimax; with more seats it is maxn.

use crate::core::{PlayerId, PlayerMap};
use crate::moves::MoveRecord;

/// Score vector, one entry per seat.
pub type Scores = PlayerMap<f64>;

/// Transient record of one searched move. Never escapes the driver.
#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
    pub mv: MoveRecord,
    pub scores: Scores,
    /// Best continuation after `mv`, `mv` itself excluded.
    pub line: Vec<MoveRecord>,
    pub depth_remaining: u32,
}

impl SearchNode {
    pub fn value_for(&self, player: PlayerId) -> f64 {
        self.scores[player]
    }

    /// `mv` followed by its best continuation.
    pub fn into_line(self) -> Vec<MoveRecord> {
        let mut line = Vec::with_capacity(self.line.len() + 1);
        line.push(self.mv);
        line.extend(self.line);
        line
    }
}

/// Two-seat vector from seat 0's point of view.
pub(crate) fn zero_sum(v0: f64) -> Scores {
    let mut s = PlayerMap::with_value(2, v0);
    s[PlayerId(1)] = -v0;
    s
}
