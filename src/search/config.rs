//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Randomised move choice for the opening plies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomizationWindow {
    /// Randomise while the board's move number is at most this.
    pub plies: u32,
    /// Choose among at most this many of the best root moves.
    pub moves: usize,
    /// Only moves within this much of the best score qualify.
    pub epsilon: f64,
}

/// Alpha-beta search configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Deepest ply searched. Root moves are ply 1.
    pub max_depth: u32,

    /// Prune with alpha-beta bounds (two-player games only).
    pub allow_alpha_beta: bool,

    /// Try moves that caused cutoffs at the same ply first.
    pub allow_killer: bool,

    /// Evaluate each candidate once and sort best-first before recursing.
    pub static_ordering: bool,

    /// Stop searching a node once the mover has a move scoring at least
    /// this much. Usually the game's win value.
    pub good_enough_to_quit: Option<f64>,

    pub randomization: Option<RandomizationWindow>,

    /// Skip sibling moves that lead to a position already searched from
    /// the same node.
    pub allow_duplicate_digest_pruning: bool,

    /// Stop after visiting this many nodes.
    pub node_budget: Option<u64>,

    /// Stop after this many milliseconds.
    pub time_budget_ms: Option<u64>,

    /// Progressive deepening: search to this depth first, then two plies
    /// deeper each round up to `max_depth`. A round cut short by a budget
    /// is discarded in favour of the last finished one.
    pub progressive_first_depth: Option<u32>,

    /// Check digests around every make/unmake pair and after cloning.
    pub verify_digests: bool,

    /// Seed for randomised move choice.
    pub seed: u64,

    /// Return a lone legal root move without searching.
    pub single_choice_optimization: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            allow_alpha_beta: true,
            allow_killer: true,
            static_ordering: true,
            good_enough_to_quit: None,
            randomization: None,
            allow_duplicate_digest_pruning: true,
            node_budget: None,
            time_budget_ms: None,
            progressive_first_depth: None,
            verify_digests: cfg!(debug_assertions),
            seed: 42,
            single_choice_optimization: true,
        }
    }
}

impl SearchConfig {
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_alpha_beta(mut self, allow: bool) -> Self {
        self.allow_alpha_beta = allow;
        self
    }

    pub fn with_killer(mut self, allow: bool) -> Self {
        self.allow_killer = allow;
        self
    }

    pub fn with_static_ordering(mut self, on: bool) -> Self {
        self.static_ordering = on;
        self
    }

    pub fn with_good_enough(mut self, threshold: Option<f64>) -> Self {
        self.good_enough_to_quit = threshold;
        self
    }

    pub fn with_randomization(mut self, window: Option<RandomizationWindow>) -> Self {
        self.randomization = window;
        self
    }

    pub fn with_duplicate_pruning(mut self, allow: bool) -> Self {
        self.allow_duplicate_digest_pruning = allow;
        self
    }

    pub fn with_node_budget(mut self, nodes: Option<u64>) -> Self {
        self.node_budget = nodes;
        self
    }

    pub fn with_time_budget_ms(mut self, ms: Option<u64>) -> Self {
        self.time_budget_ms = ms;
        self
    }

    pub fn with_progressive(mut self, first_depth: Option<u32>) -> Self {
        self.progressive_first_depth = first_depth;
        self
    }

    pub fn with_verify_digests(mut self, on: bool) -> Self {
        self.verify_digests = on;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_single_choice(mut self, on: bool) -> Self {
        self.single_choice_optimization = on;
        self
    }
}
