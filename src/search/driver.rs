//! Depth-limited alpha-beta / maxn search over a board workspace.
//!
//! Every candidate is applied with `robot_execute`, searched, and reverted
//! with `un_execute` before its result is even looked at, so the board is
//! back in its starting position whenever control leaves a node, errors
//! included.
//!
//! Per node:
//! 1. generate moves; an empty list in a live position is fatal
//! 2. optional static ordering (make, evaluate, unmake, sort best-first)
//! 3. killer promotion
//! 4. for each move: make, skip sibling duplicates by digest, recurse,
//!    unmake, update best / bounds, stop on cutoff or good-enough score
//!
//! Budgets (nodes, time, external cancel flag) are checked between root
//! siblings and every 1024 nodes. Running out stops the search cleanly and
//! the best fully searched root move is returned. The root move that was
//! being searched when the budget ran out only counts if it is the first.
//!
//! With `progressive_first_depth` set, the root is searched repeatedly at
//! increasing depth under one shared budget, and a round that does not
//! finish is replaced by the last one that did.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::board::{Board, BoardState};
use crate::core::{GameRng, PlayerId, PlayerMap};
use crate::error::{DigestMismatch, SearchError};
use crate::moves::MoveRecord;
use crate::rules::{GameOutcome, Rules};

use super::config::{RandomizationWindow, SearchConfig};
use super::killer::KillerTable;
use super::node::{zero_sum, Scores, SearchNode};
use super::stats::SearchStats;

/// Outcome of one search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Move to play.
    pub best: MoveRecord,
    /// Score of `best` for the player to move.
    pub score: f64,
    /// `best` followed by the expected replies.
    pub principal_variation: Vec<MoveRecord>,
    /// Every root move that was searched, with its score, in search order.
    pub scored_moves: Vec<(MoveRecord, f64)>,
    pub aborted: bool,
    pub stats: SearchStats,
}

/// Reusable search context. Owns its RNG, killer table and statistics;
/// shares nothing with other drivers.
pub struct SearchDriver {
    config: SearchConfig,
    rng: GameRng,
    killers: KillerTable,
    stats: SearchStats,
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
    max_depth: u32,
    /// Root move to search first, from the previous deepening round.
    lead: Option<MoveRecord>,
}

impl SearchDriver {
    pub fn new(config: SearchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            rng,
            killers: KillerTable::new(),
            stats: SearchStats::default(),
            cancel: None,
            deadline: None,
            max_depth: 1,
            lead: None,
        }
    }

    /// Stop cooperatively when `flag` becomes true.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Use a specific random stream, e.g. one forked per robot seat.
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn killers(&self) -> &KillerTable {
        &self.killers
    }

    /// Best move for the player to move on `board`.
    ///
    /// `board` is used as the search workspace and is left exactly as it
    /// was found. Callers holding an authoritative board pass a clone.
    pub fn find_static_best_move<R: Rules>(
        &mut self,
        board: &mut Board<R>,
    ) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        self.stats.reset();
        self.killers.clear();
        self.deadline = self
            .config
            .time_budget_ms
            .map(|ms| start + Duration::from_millis(ms));
        self.max_depth = self.config.max_depth.max(1);
        self.lead = None;

        if board.is_game_over() {
            return Err(SearchError::TerminalPosition);
        }
        if self.config.verify_digests {
            let copy = board.clone_board();
            board.same_board(&copy)?;
        }
        let root_digest = board.digest();

        let mover = board.whose_turn();
        let moves = board.rules().legal_moves(board, mover);
        if moves.is_empty() {
            return Err(SearchError::NoMovesInNonTerminalState {
                player: mover,
                state: board.state(),
                ply: 0,
            });
        }

        let result = if self.config.single_choice_optimization && moves.len() == 1 {
            self.single_choice(board, moves)
        } else {
            self.deepen(board, moves)
        };

        let actual = board.digest();
        if actual != root_digest {
            return Err(DigestMismatch {
                context: "search unwind",
                expected: root_digest,
                actual,
            }
            .into());
        }

        let mut result = result?;
        self.stats.time_us = start.elapsed().as_micros() as u64;
        result.stats = self.stats.clone();

        debug!(
            player = %mover,
            best = %result.best,
            score = result.score,
            nodes = self.stats.nodes,
            evaluations = self.stats.evaluations,
            cutoffs = self.stats.cutoffs,
            depth = self.stats.max_depth_reached,
            completed_depth = self.stats.completed_depth,
            aborted = result.aborted,
            time_us = self.stats.time_us,
            "search finished"
        );
        Ok(result)
    }

    fn single_choice<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        mut moves: Vec<MoveRecord>,
    ) -> Result<SearchResult, SearchError> {
        let mover = board.whose_turn();
        let mut mv = moves.remove(0);

        let before = self.config.verify_digests.then(|| board.digest());
        board.robot_execute(&mut mv)?;
        let scores = self.leaf_scores(board, 0);
        self.unmake(board, &mut mv, before)?;

        let score = scores[mover];
        let best = mv.specification();
        Ok(SearchResult {
            principal_variation: vec![best.clone()],
            scored_moves: vec![(best.clone(), score)],
            best,
            score,
            aborted: false,
            stats: SearchStats::default(),
        })
    }

    /// One root search at `max_depth`, or progressive rounds up to it.
    fn deepen<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        moves: Vec<MoveRecord>,
    ) -> Result<SearchResult, SearchError> {
        let final_depth = self.config.max_depth.max(1);
        let Some(first) = self.config.progressive_first_depth else {
            let result = self.search_root(board, moves)?;
            if !result.aborted {
                self.stats.completed_depth = final_depth;
            }
            return Ok(result);
        };

        let mut depth = first.clamp(1, final_depth);
        let mut completed: Option<SearchResult> = None;
        loop {
            self.max_depth = depth;
            let result = self.search_root(board, moves.clone())?;
            if result.aborted {
                return Ok(match completed {
                    Some(done) => {
                        debug!(depth, kept = %done.best, "deepening round cut short");
                        SearchResult {
                            aborted: true,
                            ..done
                        }
                    }
                    None => result,
                });
            }

            self.stats.completed_depth = depth;
            trace!(depth, best = %result.best, score = result.score, "deepening round finished");
            if depth >= final_depth {
                return Ok(result);
            }
            self.lead = Some(result.best.clone());
            completed = Some(result);
            depth = (depth + 2).min(final_depth);
        }
    }

    fn search_root<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        mut moves: Vec<MoveRecord>,
    ) -> Result<SearchResult, SearchError> {
        let mover = board.whose_turn();
        let state = board.state();
        let randomize = self
            .config
            .randomization
            .filter(|w| board.move_number() <= w.plies);
        let prune = self.config.allow_alpha_beta && board.player_count() == 2 && randomize.is_none();

        self.order_moves(board, &mut moves, 0)?;
        if let Some(lead) = &self.lead {
            if let Some(i) = moves.iter().position(|m| m == lead) {
                let m = moves.remove(i);
                moves.insert(0, m);
            }
        }

        let mut alpha = f64::NEG_INFINITY;
        let mut beta = f64::INFINITY;
        let mut seen = FxHashSet::default();
        let mut best: Option<SearchNode> = None;
        let mut scored: Vec<SearchNode> = Vec::with_capacity(moves.len());

        for mut mv in moves {
            if best.is_some() && self.out_of_budget() {
                break;
            }

            let before = self.config.verify_digests.then(|| board.digest());
            board.robot_execute(&mut mv)?;
            if self.config.allow_duplicate_digest_pruning && !seen.insert(board.digest()) {
                self.unmake(board, &mut mv, before)?;
                self.stats.duplicates_pruned += 1;
                continue;
            }
            self.visit(1);

            let child = self.child_value(board, 1, self.max_depth - 1, alpha, beta);
            self.unmake(board, &mut mv, before)?;
            let (scores, line) = child?;

            if best.is_some() && self.aborted() {
                trace!(mv = %mv, "root move cut short by the budget, discarded");
                break;
            }

            let node = SearchNode {
                mv: mv.specification(),
                scores,
                line,
                depth_remaining: self.max_depth - 1,
            };
            let value = node.value_for(mover);
            trace!(mv = %node.mv, value, depth = node.depth_remaining, "root move");

            if best.as_ref().map_or(true, |b| value > b.value_for(mover)) {
                best = Some(node.clone());
            }
            if prune {
                let v0 = node.value_for(PlayerId(0));
                if mover == PlayerId(0) {
                    alpha = alpha.max(v0);
                } else {
                    beta = beta.min(v0);
                }
            }
            scored.push(node);

            if self.good_enough(value) {
                self.stats.good_enough_cutoffs += 1;
                break;
            }
        }

        let best = best.ok_or(SearchError::NoMovesInNonTerminalState {
            player: mover,
            state,
            ply: 0,
        })?;
        let chosen = match randomize {
            Some(window) => self.nth_good_move(&scored, mover, window).unwrap_or(best),
            None => best,
        };

        let score = chosen.value_for(mover);
        let scored_moves = scored
            .iter()
            .map(|n| (n.mv.clone(), n.value_for(mover)))
            .collect();
        self.stats.aborted = self.aborted();
        Ok(SearchResult {
            best: chosen.mv.clone(),
            score,
            principal_variation: chosen.into_line(),
            scored_moves,
            aborted: self.stats.aborted,
            stats: SearchStats::default(),
        })
    }

    /// Pick uniformly among the best `window.moves` root moves that score
    /// within `window.epsilon` of the best.
    fn nth_good_move(
        &mut self,
        scored: &[SearchNode],
        mover: PlayerId,
        window: RandomizationWindow,
    ) -> Option<SearchNode> {
        let mut ranked: Vec<&SearchNode> = scored.iter().collect();
        ranked.sort_by(|a, b| b.value_for(mover).total_cmp(&a.value_for(mover)));
        let top = ranked.first()?.value_for(mover);

        let candidates: Vec<&SearchNode> = ranked
            .into_iter()
            .take_while(|n| n.value_for(mover) >= top - window.epsilon)
            .take(window.moves.max(1))
            .collect();
        let pick = self.rng.gen_range_usize(0..candidates.len());
        trace!(candidates = candidates.len(), pick, "randomized root choice");
        Some(candidates[pick].clone())
    }

    fn child_value<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        ply: u32,
        depth_left: u32,
        alpha: f64,
        beta: f64,
    ) -> Result<(Scores, Vec<MoveRecord>), SearchError> {
        if depth_left == 0 || board.is_game_over() || board.state() == BoardState::DrawPending {
            return Ok((self.leaf_scores(board, depth_left), Vec::new()));
        }
        self.search_node(board, ply, depth_left, alpha, beta)
    }

    fn search_node<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        ply: u32,
        depth_left: u32,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<(Scores, Vec<MoveRecord>), SearchError> {
        let mover = board.whose_turn();
        let mut moves = board.rules().legal_moves(board, mover);
        if moves.is_empty() {
            return Err(SearchError::NoMovesInNonTerminalState {
                player: mover,
                state: board.state(),
                ply,
            });
        }
        self.order_moves(board, &mut moves, ply)?;

        let prune = self.config.allow_alpha_beta && board.player_count() == 2;
        let mut seen = FxHashSet::default();
        let mut best: Option<SearchNode> = None;

        for mut mv in moves {
            if self.aborted() {
                break;
            }

            let before = self.config.verify_digests.then(|| board.digest());
            board.robot_execute(&mut mv)?;
            if self.config.allow_duplicate_digest_pruning && !seen.insert(board.digest()) {
                self.unmake(board, &mut mv, before)?;
                self.stats.duplicates_pruned += 1;
                continue;
            }
            self.visit(ply + 1);

            let child = self.child_value(board, ply + 1, depth_left - 1, alpha, beta);
            self.unmake(board, &mut mv, before)?;
            let (scores, line) = child?;

            let value = scores[mover];
            let v0 = scores[PlayerId(0)];
            let node = SearchNode {
                mv,
                scores,
                line,
                depth_remaining: depth_left - 1,
            };
            if best.as_ref().map_or(true, |b| value > b.value_for(mover)) {
                best = Some(node.clone());
            }

            if prune {
                if mover == PlayerId(0) {
                    alpha = alpha.max(v0);
                } else {
                    beta = beta.min(v0);
                }
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    if self.config.allow_killer {
                        self.killers.record(ply as usize, &node.mv);
                    }
                    break;
                }
            }
            if self.good_enough(value) {
                self.stats.good_enough_cutoffs += 1;
                break;
            }
        }

        Ok(match best {
            Some(node) => {
                let scores = node.scores.clone();
                (scores, node.into_line())
            }
            // cancelled before the first child
            None => (self.leaf_scores(board, depth_left), Vec::new()),
        })
    }

    /// Static ordering and killer promotion.
    fn order_moves<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        moves: &mut Vec<MoveRecord>,
        ply: u32,
    ) -> Result<(), SearchError> {
        if self.config.static_ordering && moves.len() > 1 {
            let mover = board.whose_turn();
            let mut keyed = Vec::with_capacity(moves.len());
            for mut mv in moves.drain(..) {
                let before = self.config.verify_digests.then(|| board.digest());
                board.robot_execute(&mut mv)?;
                let value = self.leaf_scores(board, 0)[mover];
                self.unmake(board, &mut mv, before)?;
                keyed.push((value, mv));
            }
            // stable, so ties keep generator order
            keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
            moves.extend(keyed.into_iter().map(|(_, m)| m));
        }
        if self.config.allow_killer {
            self.stats.killer_hits += self.killers.promote(ply as usize, moves) as u64;
        }
        Ok(())
    }

    /// Score vector of the current position. Decided games score
    /// `value_of_win` plus the remaining depth, so quicker wins rank
    /// higher.
    fn leaf_scores<R: Rules>(&mut self, board: &Board<R>, depth_left: u32) -> Scores {
        let n = board.player_count();
        let win = board.rules().value_of_win() + depth_left as f64;
        match board.outcome() {
            Some(GameOutcome::Winner(w)) => {
                PlayerMap::new(n, |p| if p == w { win } else { -win })
            }
            Some(GameOutcome::Draw) => PlayerMap::with_value(n, 0.0),
            None if board.state() == BoardState::DrawPending => PlayerMap::with_value(n, 0.0),
            None => {
                self.stats.evaluations += 1;
                let rules = board.rules();
                if n == 2 {
                    zero_sum(rules.evaluate(board, PlayerId(0)) - rules.evaluate(board, PlayerId(1)))
                } else {
                    PlayerMap::new(n, |p| rules.evaluate(board, p))
                }
            }
        }
    }

    fn unmake<R: Rules>(
        &mut self,
        board: &mut Board<R>,
        mv: &mut MoveRecord,
        before: Option<u64>,
    ) -> Result<(), SearchError> {
        board.un_execute(mv)?;
        if let Some(expected) = before {
            let actual = board.digest();
            if actual != expected {
                return Err(DigestMismatch {
                    context: "unwind",
                    expected,
                    actual,
                }
                .into());
            }
        }
        Ok(())
    }

    fn good_enough(&self, value: f64) -> bool {
        self.config.good_enough_to_quit.is_some_and(|t| value >= t)
    }

    fn visit(&mut self, ply: u32) {
        debug_assert!(ply <= self.max_depth, "ply {ply} beyond max depth {}", self.max_depth);
        self.stats.nodes += 1;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(ply);
        if self.config.node_budget.is_some_and(|b| self.stats.nodes >= b) {
            self.stats.aborted = true;
        }
        if self.stats.nodes & 1023 == 0 {
            self.out_of_budget();
        }
    }

    fn aborted(&self) -> bool {
        self.stats.aborted
    }

    /// Check the clock and the cancel flag. Sticky once tripped.
    fn out_of_budget(&mut self) -> bool {
        if !self.stats.aborted {
            let cancelled = self
                .cancel
                .as_ref()
                .is_some_and(|c| c.load(Ordering::Relaxed));
            let late = self.deadline.is_some_and(|d| Instant::now() >= d);
            self.stats.aborted = cancelled || late;
        }
        self.stats.aborted
    }
}
