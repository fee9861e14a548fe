//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Positions visited by make/unmake in the tree (not counting static
    /// ordering probes).
    pub nodes: u64,

    /// Static evaluations performed, leaves and ordering probes alike.
    pub evaluations: u64,

    /// Alpha-beta cutoffs.
    pub cutoffs: u64,

    /// Nodes abandoned because a good-enough score was found.
    pub good_enough_cutoffs: u64,

    /// Killer moves found in a move list and promoted.
    pub killer_hits: u64,

    /// Sibling moves skipped because they repeated a sibling's position.
    pub duplicates_pruned: u64,

    /// Deepest ply visited.
    pub max_depth_reached: u32,

    /// Depth of the last root search that ran to the end. Zero if the
    /// budget ran out during the first one.
    pub completed_depth: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,

    /// The node or time budget ran out, or the search was cancelled.
    pub aborted: bool,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
