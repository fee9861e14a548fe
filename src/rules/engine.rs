//! The per-game collaborator trait.
//!
//! The core never interprets game concepts. It asks the rules for:
//! - the board geometry
//! - legal moves for a player
//! - a static evaluation
//! - whether a player has won
//!
//! and lets the rules hook into move execution for captures, spills and
//! custom operations.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{ChipId, Location, PlayerId};
use crate::error::ExecError;
use crate::moves::{MoveRecord, OpcodeTable};

use super::layout::BoardLayout;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(PlayerId),
    Draw,
}

impl GameOutcome {
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameOutcome::Winner(p) if *p == player)
    }
}

/// Game rules.
///
/// ## Implementation Notes
///
/// - `legal_moves` must return at least one move (`Done`, `Pass`, ...) for
///   every position that is not over. An empty list in a live position is
///   treated as a rules defect by the search.
/// - `evaluate` should grow as `player` gets closer to winning and stay
///   below `value_of_win`.
/// - `apply_effects` runs inside `execute`. Chip transfers it makes through
///   [`Board::transfer`] are journaled and undone automatically.
pub trait Rules: Clone + Send + 'static {
    fn layout(&self) -> &BoardLayout;

    fn legal_moves(&self, board: &Board<Self>, player: PlayerId) -> Vec<MoveRecord>;

    fn evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64;

    fn has_won(&self, board: &Board<Self>, player: PlayerId) -> bool;

    /// Owner of a chip kind, `None` for neutral chips anyone may pick.
    fn chip_owner(&self, chip: ChipId) -> Option<PlayerId>;

    // === Provided ===

    fn value_of_win(&self) -> f64 {
        1000.0
    }

    /// Rule-specific drop legality for staged play. Not consulted in
    /// `Puzzle` or by `execute` of complete `Move` records.
    fn can_drop(&self, _board: &Board<Self>, _chip: ChipId, _from: Location, _to: Location) -> bool {
        true
    }

    /// How many occurrences of a confirmed position make it a draw offer.
    fn repetition_limit(&self) -> u32 {
        2
    }

    fn opcodes(&self) -> OpcodeTable {
        OpcodeTable::STANDARD
    }

    /// Place the initial chips on a fresh board.
    fn setup(_board: &mut Board<Self>) {}

    /// Game-specific consequences of a move, run after the core has
    /// applied it. Custom operations are executed entirely here.
    fn apply_effects(_board: &mut Board<Self>, _m: &mut MoveRecord) -> Result<(), ExecError> {
        Ok(())
    }

    /// Safe move when the robot's search fails.
    fn fallback_move(&self, _board: &Board<Self>, player: PlayerId) -> MoveRecord {
        MoveRecord::resign(player)
    }
}
