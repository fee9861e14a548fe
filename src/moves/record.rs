//! Move records: one state transition, as specified by a player.
//!
//! A record says *what* was asked for (operation, source, targets, mover).
//! Executing it on a board attaches undo bookkeeping, but that bookkeeping
//! and the display-only payload never take part in comparisons: two records
//! are equal when they specify the same move.

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::board::journal::UndoInfo;
use crate::core::{ChipId, Location, PlayerId};

use super::opcode::{MoveOp, OpcodeTable, MAX_TARGETS};

/// A single move.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    /// What kind of transition this is.
    pub op: MoveOp,

    /// Where the moving chip comes from (`Nowhere` if nothing moves).
    pub source: Location,

    /// Primary target first, then optional secondary/tertiary targets.
    pub targets: SmallVec<[Location; MAX_TARGETS]>,

    /// The player who made the move.
    pub player: PlayerId,

    /// Position in the game record, if known.
    pub index: Option<u32>,

    /// Chip moved, for display and logs only.
    pub payload: Option<ChipId>,

    pub(crate) undo: Option<UndoInfo>,
}

impl MoveRecord {
    /// A record with no locations.
    #[must_use]
    pub fn new(op: MoveOp, player: PlayerId) -> Self {
        Self {
            op,
            source: Location::Nowhere,
            targets: SmallVec::new(),
            player,
            index: None,
            payload: None,
            undo: None,
        }
    }

    #[must_use]
    pub fn done(player: PlayerId) -> Self {
        Self::new(MoveOp::Done, player)
    }

    #[must_use]
    pub fn edit(player: PlayerId) -> Self {
        Self::new(MoveOp::Edit, player)
    }

    /// `Start` names the player who is to move.
    #[must_use]
    pub fn start(player: PlayerId) -> Self {
        Self::new(MoveOp::Start, player)
    }

    #[must_use]
    pub fn resign(player: PlayerId) -> Self {
        Self::new(MoveOp::Resign, player)
    }

    #[must_use]
    pub fn pass(player: PlayerId) -> Self {
        Self::new(MoveOp::Pass, player)
    }

    #[must_use]
    pub fn null(player: PlayerId) -> Self {
        Self::new(MoveOp::Null, player)
    }

    /// Pick from a pool slot (`Pick`) or a board cell (`Pickb`).
    #[must_use]
    pub fn pick(player: PlayerId, from: Location) -> Self {
        let op = if from.is_board() { MoveOp::PickBoard } else { MoveOp::Pick };
        Self {
            source: from,
            ..Self::new(op, player)
        }
    }

    /// Drop onto a pool slot (`Drop`) or a board cell (`Dropb`).
    #[must_use]
    pub fn drop(player: PlayerId, to: Location) -> Self {
        let op = if to.is_board() { MoveOp::DropBoard } else { MoveOp::Drop };
        let mut m = Self::new(op, player);
        m.targets.push(to);
        m
    }

    /// Complete move from `from` to `to`.
    #[must_use]
    pub fn movement(player: PlayerId, from: Location, to: Location) -> Self {
        let mut m = Self::new(MoveOp::Move, player);
        m.source = from;
        m.targets.push(to);
        m
    }

    /// Game-specific operation over a list of locations; the first is the
    /// source.
    #[must_use]
    pub fn custom(code: u16, player: PlayerId, locations: &[Location]) -> Self {
        let mut m = Self::new(MoveOp::Custom(code), player);
        if let Some((first, rest)) = locations.split_first() {
            m.source = *first;
            m.targets.extend_from_slice(rest);
        }
        m
    }

    /// Append a secondary target.
    #[must_use]
    pub fn with_target(mut self, to: Location) -> Self {
        self.targets.push(to);
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, chip: ChipId) -> Self {
        self.payload = Some(chip);
        self
    }

    /// Primary target, `Nowhere` if none.
    #[must_use]
    pub fn destination(&self) -> Location {
        self.targets.first().copied().unwrap_or(Location::Nowhere)
    }

    /// Same operation, locations and player. Payload, index and undo
    /// bookkeeping are ignored.
    #[must_use]
    pub fn same_specified_move(&self, other: &MoveRecord) -> bool {
        self.op == other.op
            && self.player == other.player
            && self.source == other.source
            && self.targets == other.targets
    }

    /// Undo bookkeeping, present once the record has been executed.
    #[must_use]
    pub fn undo_info(&self) -> Option<&UndoInfo> {
        self.undo.as_ref()
    }

    /// Opaque per-game auxiliary value stored by the rules while executing.
    #[must_use]
    pub fn aux(&self) -> u64 {
        self.undo.as_ref().map_or(0, |u| u.aux)
    }

    /// Set the opaque auxiliary value. Only meaningful while executing.
    pub fn set_aux(&mut self, aux: u64) {
        if let Some(undo) = self.undo.as_mut() {
            undo.aux = aux;
        }
    }

    /// Copy without bookkeeping; what a history list or a peer should see.
    #[must_use]
    pub fn specification(&self) -> Self {
        Self {
            undo: None,
            ..self.clone()
        }
    }
}

impl PartialEq for MoveRecord {
    fn eq(&self, other: &Self) -> bool {
        self.same_specified_move(other)
    }
}

impl Eq for MoveRecord {}

impl Hash for MoveRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.op.hash(state);
        self.player.hash(state);
        self.source.hash(state);
        self.targets.as_slice().hash(state);
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.player, self.serialize(&OpcodeTable::STANDARD))
    }
}
