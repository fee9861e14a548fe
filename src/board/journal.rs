//! Undo journal entries stored on executed move records.
//!
//! Executing a move snapshots the small core fields it may touch and logs
//! every chip transfer it performs. Reverting replays the transfers
//! backwards and restores the snapshot, so `un_execute` needs nothing but
//! the move record itself.

use smallvec::SmallVec;

use crate::core::{ChipId, Location, PlayerId};
use crate::rules::GameOutcome;

use super::state::BoardState;

/// One chip moved between two places. `Location::Nowhere` is the
/// picked-up slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: Location,
    pub to: Location,
    pub chip: ChipId,
}

/// Staged pick/drop bookkeeping. At most one chip is picked at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Staging {
    pub picked_object: Option<ChipId>,
    pub picked_source: SmallVec<[Location; 2]>,
    pub dropped_dest: SmallVec<[Location; 2]>,
    /// State to return to when the pick is backed out. Set when a pick
    /// leaves `DrawPending`.
    pub prior_state: Option<BoardState>,
}

impl Staging {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picked_object.is_none()
            && self.picked_source.is_empty()
            && self.dropped_dest.is_empty()
            && self.prior_state.is_none()
    }

    pub fn clear(&mut self) {
        self.picked_object = None;
        self.picked_source.clear();
        self.dropped_dest.clear();
        self.prior_state = None;
    }
}

/// Everything needed to revert one executed move.
#[derive(Clone, Debug, PartialEq)]
pub struct UndoInfo {
    pub(crate) state: BoardState,
    pub(crate) unresign: Option<BoardState>,
    pub(crate) whose_turn: PlayerId,
    pub(crate) move_number: u32,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) staging: Staging,
    pub(crate) transfers: SmallVec<[Transfer; 2]>,
    /// Digest recorded in the repetition table by this move, if any.
    pub(crate) recorded_digest: Option<u64>,
    /// True if the robot path confirmed the move with an implicit `Done`.
    pub(crate) auto_done: bool,
    /// Opaque per-game payload (for example a count of spilled chips).
    pub aux: u64,
}

impl UndoInfo {
    /// State the board was in before the move.
    #[must_use]
    pub fn prior_state(&self) -> BoardState {
        self.state
    }

    #[must_use]
    pub fn prior_move_number(&self) -> u32 {
        self.move_number
    }

    /// Chip transfers in execution order.
    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Digest this move added to the repetition table, if it ended a turn.
    #[must_use]
    pub fn recorded_digest(&self) -> Option<u64> {
        self.recorded_digest
    }

    #[must_use]
    pub fn auto_done(&self) -> bool {
        self.auto_done
    }
}
