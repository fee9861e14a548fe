//! The board aggregate: cells, pools, staged pick/drop, finite state.
//!
//! All mutation goes through two paths that share the same primitives:
//!
//! - **Staged play** (`pick`, `drop`, `unpick`, `undrop`, `done`, ...): what
//!   a human does one click at a time. Every pick can be backed out with an
//!   unpick and every drop with an undrop.
//! - **Records** (`execute`, `robot_execute`, `un_execute`): a `MoveRecord`
//!   is dispatched onto the staged operations while every chip transfer is
//!   journaled. The journal and a snapshot of the scalar fields are stored
//!   on the record, so `un_execute` needs nothing else.
//!
//! Execution is all-or-nothing: if any step fails, the transfers made so
//! far are replayed backwards and the snapshot restored before the error
//! is returned.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, error, trace};

use crate::core::{ChipId, Coord, Location, PlayerId, PlayerMap};
use crate::digest::{DigestKeys, RepeatedPositions};
use crate::error::{DigestMismatch, ExecError, TransitionError};
use crate::moves::{MoveOp, MoveRecord};
use crate::rules::{BoardLayout, GameOutcome, Rules};

use super::cell::Cell;
use super::journal::{Staging, Transfer, UndoInfo};
use super::state::BoardState;

/// Game board, generic over the rules collaborator.
#[derive(Clone)]
pub struct Board<R: Rules> {
    rules: R,
    layout: BoardLayout,
    cells: Vec<Cell>,
    pools: PlayerMap<Vec<Cell>>,
    staging: Staging,
    state: BoardState,
    /// State to return to if a resignation is withdrawn.
    unresign: Option<BoardState>,
    whose_turn: PlayerId,
    move_number: u32,
    outcome: Option<GameOutcome>,
    repeated: RepeatedPositions,
    keys: Arc<DigestKeys>,
    journaling: bool,
    pending: SmallVec<[Transfer; 2]>,
    recorded: Option<u64>,
}

impl<R: Rules> Board<R> {
    /// Fresh board in `Puzzle` with the rules' initial setup applied.
    ///
    /// # Panics
    ///
    /// If the rules' layout fails `BoardLayout::validate`.
    pub fn new(rules: R) -> Self {
        let layout = rules.layout().clone();
        if let Err(reason) = layout.validate() {
            panic!("invalid board layout: {reason}");
        }
        debug_assert!(
            rules.opcodes().validate().is_ok(),
            "invalid opcode table: {:?}",
            rules.opcodes().validate()
        );

        let keys = Arc::new(DigestKeys::new(&layout));
        let pools = PlayerMap::new(layout.player_count, |_| {
            vec![Cell::default(); layout.pool_slots as usize]
        });

        let mut board = Self {
            cells: vec![Cell::default(); layout.cell_count()],
            pools,
            rules,
            layout,
            staging: Staging::default(),
            state: BoardState::Puzzle,
            unresign: None,
            whose_turn: PlayerId::new(0),
            move_number: 1,
            outcome: None,
            repeated: RepeatedPositions::new(),
            keys,
            journaling: false,
            pending: SmallVec::new(),
            recorded: None,
        };
        R::setup(&mut board);
        board
    }

    /// Back to the initial setup, keeping rules and digest keys.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (_, slots) in self.pools.iter_mut() {
            for cell in slots {
                cell.clear();
            }
        }
        self.staging.clear();
        self.state = BoardState::Puzzle;
        self.unresign = None;
        self.whose_turn = PlayerId::new(0);
        self.move_number = 1;
        self.outcome = None;
        self.repeated.clear();
        self.pending.clear();
        self.recorded = None;
        R::setup(self);
    }

    // === Accessors ===

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.layout.player_count
    }

    #[must_use]
    pub fn state(&self) -> BoardState {
        self.state
    }

    #[must_use]
    pub fn whose_turn(&self) -> PlayerId {
        self.whose_turn
    }

    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state == BoardState::GameOver
    }

    #[must_use]
    pub fn staging(&self) -> &Staging {
        &self.staging
    }

    #[must_use]
    pub fn picked_object(&self) -> Option<ChipId> {
        self.staging.picked_object
    }

    /// Where the chip in hand came from.
    #[must_use]
    pub fn picked_source(&self) -> Option<Location> {
        self.staging.picked_source.last().copied()
    }

    /// Last provisional placement, present only while the move is staged.
    #[must_use]
    pub fn dropped_destination(&self) -> Option<Location> {
        self.staging.dropped_dest.last().copied()
    }

    #[must_use]
    pub fn repeated_positions(&self) -> &RepeatedPositions {
        &self.repeated
    }

    /// Cell at a board or pool location.
    #[must_use]
    pub fn cell_at(&self, loc: Location) -> Option<&Cell> {
        match loc {
            Location::Board(c) => self.layout.cell_id(c).map(|id| &self.cells[id.index()]),
            Location::Pool { owner, slot } => self
                .layout
                .contains(loc)
                .then(|| &self.pools[owner][slot as usize]),
            Location::Nowhere => None,
        }
    }

    /// Top chip at a location.
    #[must_use]
    pub fn top(&self, loc: Location) -> Option<ChipId> {
        self.cell_at(loc).and_then(Cell::top)
    }

    /// Board cells with their coordinates, row-major.
    pub fn board_cells(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.layout.coords().zip(self.cells.iter())
    }

    /// A player's pool slots.
    #[must_use]
    pub fn pool(&self, player: PlayerId) -> &[Cell] {
        &self.pools[player]
    }

    // === Chip primitives ===

    fn cell_mut(&mut self, loc: Location) -> Result<&mut Cell, ExecError> {
        match loc {
            Location::Board(c) => match self.layout.cell_id(c) {
                Some(id) => Ok(&mut self.cells[id.index()]),
                None => Err(ExecError::OffBoard(loc)),
            },
            Location::Pool { owner, slot } if self.layout.contains(loc) => {
                Ok(&mut self.pools[owner][slot as usize])
            }
            _ => Err(ExecError::OffBoard(loc)),
        }
    }

    fn lift(&mut self, loc: Location) -> Result<ChipId, ExecError> {
        if loc.is_nowhere() {
            return self
                .staging
                .picked_object
                .take()
                .ok_or(ExecError::StaleMove(loc));
        }
        self.cell_mut(loc)?.pop().ok_or(ExecError::StaleMove(loc))
    }

    fn place(&mut self, loc: Location, chip: ChipId) -> Result<(), ExecError> {
        if loc.is_nowhere() {
            if self.staging.picked_object.is_some() {
                return Err(self.illegal("pick").into());
            }
            self.staging.picked_object = Some(chip);
            return Ok(());
        }
        self.cell_mut(loc)?.push(chip);
        Ok(())
    }

    /// Move the top chip of `from` onto `to`. `Location::Nowhere` is the
    /// picked-up slot.
    ///
    /// Inside `execute` (including `Rules::apply_effects`) the transfer is
    /// journaled and reverted by `un_execute`.
    pub fn transfer(&mut self, from: Location, to: Location) -> Result<ChipId, ExecError> {
        if to.is_nowhere() {
            if self.staging.picked_object.is_some() {
                return Err(self.illegal("pick").into());
            }
        } else if !self.layout.contains(to) {
            return Err(ExecError::OffBoard(to));
        }

        let chip = self.lift(from)?;
        self.place(to, chip)?;
        if self.journaling {
            self.pending.push(Transfer { from, to, chip });
        }
        Ok(chip)
    }

    /// Put a chip directly on a location, outside any move. For setup.
    pub fn add_chip(&mut self, loc: Location, chip: ChipId) -> Result<(), ExecError> {
        self.cell_mut(loc)?.push(chip);
        Ok(())
    }

    fn illegal(&self, action: &'static str) -> TransitionError {
        TransitionError::IllegalTransition {
            action,
            state: self.state,
        }
    }

    // === Staged play ===

    /// Lift the top chip at `loc` into the hand.
    ///
    /// Picking the chip that was just dropped takes it back (undrop).
    /// Outside `Puzzle` only the mover's own or neutral chips may be
    /// picked.
    pub fn pick(&mut self, loc: Location) -> Result<(), ExecError> {
        if !self.state.allows_pick() {
            return Err(self.illegal("pick").into());
        }
        if self.dropped_destination() == Some(loc) {
            return self.undrop();
        }
        if self.staging.picked_object.is_some() || self.state == BoardState::Confirm {
            return Err(self.illegal("pick").into());
        }

        let chip = self.top(loc).ok_or(TransitionError::NothingToPick(loc))?;
        if self.state != BoardState::Puzzle {
            if let Some(owner) = self.rules.chip_owner(chip) {
                if owner != self.whose_turn {
                    return Err(TransitionError::NothingToPick(loc).into());
                }
            }
        }

        self.transfer(loc, Location::Nowhere)?;
        self.staging.picked_source.push(loc);
        if self.state == BoardState::DrawPending {
            self.staging.prior_state = Some(BoardState::DrawPending);
            self.state = BoardState::Play;
        }
        Ok(())
    }

    /// Put the chip in hand at `loc`.
    ///
    /// Dropping back onto the pick source is an unpick. In `Play` a drop
    /// stages the move (`Confirm`); in `Puzzle` it is accepted at once.
    pub fn drop(&mut self, loc: Location) -> Result<(), ExecError> {
        let Some(chip) = self.staging.picked_object else {
            return Err(self.illegal("drop").into());
        };
        if !matches!(self.state, BoardState::Puzzle | BoardState::Play) {
            return Err(self.illegal("drop").into());
        }
        if self.picked_source() == Some(loc) {
            return self.unpick();
        }
        if !self.layout.contains(loc) {
            return Err(TransitionError::IllegalDestination(loc).into());
        }
        if self.state != BoardState::Puzzle {
            let from = self.picked_source().unwrap_or(Location::Nowhere);
            if !self.rules.can_drop(self, chip, from, loc) {
                return Err(TransitionError::IllegalDestination(loc).into());
            }
        }

        self.transfer(Location::Nowhere, loc)?;
        if self.state == BoardState::Puzzle {
            self.staging.clear();
        } else {
            self.staging.dropped_dest.push(loc);
            self.state = BoardState::Confirm;
        }
        Ok(())
    }

    /// Return the chip in hand to where it was picked from. A pick that
    /// left a pending draw puts the draw back on offer.
    pub fn unpick(&mut self) -> Result<(), ExecError> {
        let (Some(src), Some(_)) = (self.picked_source(), self.staging.picked_object) else {
            return Err(self.illegal("unpick").into());
        };
        self.transfer(Location::Nowhere, src)?;
        self.staging.picked_source.pop();
        if let Some(prior) = self.staging.prior_state.take() {
            self.state = prior;
        }
        Ok(())
    }

    /// Take the last dropped chip back into the hand.
    pub fn undrop(&mut self) -> Result<(), ExecError> {
        let Some(dest) = self.dropped_destination() else {
            return Err(self.illegal("undrop").into());
        };
        self.transfer(dest, Location::Nowhere)?;
        self.staging.dropped_dest.pop();
        if self.state == BoardState::Confirm {
            self.state = BoardState::Play;
        }
        Ok(())
    }

    /// Commit the staged move, a resignation, or a draw offer.
    pub fn done(&mut self) -> Result<(), ExecError> {
        match self.state {
            BoardState::Confirm => {
                self.staging.clear();
                self.finish_turn();
                Ok(())
            }
            BoardState::Resign => {
                let winner = self.whose_turn.next(self.layout.player_count);
                self.end_game(GameOutcome::Winner(winner));
                Ok(())
            }
            BoardState::DrawPending => {
                self.end_game(GameOutcome::Draw);
                Ok(())
            }
            _ => Err(self.illegal("done").into()),
        }
    }

    /// Toggle resignation. Resigning again withdraws it.
    pub fn resign(&mut self) -> Result<(), ExecError> {
        match self.state {
            BoardState::Resign => {
                self.state = self.unresign.take().unwrap_or(BoardState::Play);
                Ok(())
            }
            BoardState::Play | BoardState::Confirm | BoardState::DrawPending => {
                self.unresign = Some(self.state);
                self.state = BoardState::Resign;
                Ok(())
            }
            _ => Err(self.illegal("resign").into()),
        }
    }

    /// Back to free placement. Chips stay where they are.
    pub fn edit(&mut self) -> Result<(), ExecError> {
        if self.staging.picked_object.is_some() {
            self.unpick()?;
        }
        self.staging.clear();
        self.state = BoardState::Puzzle;
        self.unresign = None;
        self.outcome = None;
        Ok(())
    }

    /// Enter play with `player` to move.
    pub fn start(&mut self, player: PlayerId) -> Result<(), ExecError> {
        if player.index() >= self.layout.player_count {
            return Err(self.illegal("start").into());
        }
        if self.staging.picked_object.is_some() {
            self.unpick()?;
        }
        self.staging.clear();
        self.whose_turn = player;
        self.unresign = None;
        self.outcome = None;
        self.state = BoardState::Play;
        if let Some(winner) = self.current_winner(player) {
            self.end_game(GameOutcome::Winner(winner));
        }
        Ok(())
    }

    /// Stage a pass; `Done` confirms it.
    pub fn pass(&mut self) -> Result<(), ExecError> {
        if self.state != BoardState::Play || !self.staging.is_empty() {
            return Err(self.illegal("pass").into());
        }
        self.state = BoardState::Confirm;
        Ok(())
    }

    /// Hand the turn over without touching the board or the repetition
    /// table.
    pub fn null(&mut self) -> Result<(), ExecError> {
        if self.state != BoardState::Play || !self.staging.is_empty() {
            return Err(self.illegal("null").into());
        }
        self.whose_turn = self.whose_turn.next(self.layout.player_count);
        self.move_number += 1;
        Ok(())
    }

    /// A complete pick and drop. Legality is the caller's business.
    fn move_chip(&mut self, from: Location, to: Location) -> Result<(), ExecError> {
        if !matches!(
            self.state,
            BoardState::Puzzle | BoardState::Play | BoardState::DrawPending
        ) || self.staging.picked_object.is_some()
        {
            return Err(self.illegal("move").into());
        }
        match self.cell_at(from) {
            None => return Err(ExecError::OffBoard(from)),
            Some(cell) if cell.is_empty() => return Err(ExecError::StaleMove(from)),
            Some(_) => {}
        }

        self.transfer(from, Location::Nowhere)?;
        self.transfer(Location::Nowhere, to)?;
        if self.state == BoardState::Puzzle {
            self.staging.clear();
        } else {
            if self.state == BoardState::DrawPending {
                self.staging.prior_state = Some(BoardState::DrawPending);
            }
            self.staging.picked_source.push(from);
            self.staging.dropped_dest.push(to);
            self.state = BoardState::Confirm;
        }
        Ok(())
    }

    /// Winner once `mover` has finished: the mover first, then the others
    /// in seat order.
    fn current_winner(&self, mover: PlayerId) -> Option<PlayerId> {
        if self.rules.has_won(self, mover) {
            return Some(mover);
        }
        PlayerId::all(self.layout.player_count)
            .filter(|&p| p != mover)
            .find(|&p| self.rules.has_won(self, p))
    }

    fn finish_turn(&mut self) {
        let mover = self.whose_turn;
        if let Some(winner) = self.current_winner(mover) {
            self.end_game(GameOutcome::Winner(winner));
            return;
        }

        self.whose_turn = mover.next(self.layout.player_count);
        self.move_number += 1;
        self.state = BoardState::Play;

        let digest = self.digest();
        let count = self.repeated.add(digest, self.move_number);
        self.recorded = Some(digest);
        if count >= self.rules.repetition_limit() {
            trace!(digest, count, move_number = self.move_number, "position repeated");
            self.state = BoardState::DrawPending;
        }
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        debug!(?outcome, move_number = self.move_number, "game over");
        self.outcome = Some(outcome);
        self.unresign = None;
        self.state = BoardState::GameOver;
    }

    // === Records ===

    /// Apply a move record, journaling everything needed to revert it.
    pub fn execute(&mut self, m: &mut MoveRecord) -> Result<(), ExecError> {
        self.execute_inner(m, false)
    }

    /// Like `execute`, then confirm with an implicit `Done` if the move
    /// left the board waiting for one. A robot move is one full turn.
    pub fn robot_execute(&mut self, m: &mut MoveRecord) -> Result<(), ExecError> {
        self.execute_inner(m, true)
    }

    fn execute_inner(&mut self, m: &mut MoveRecord, auto_done: bool) -> Result<(), ExecError> {
        m.undo = Some(self.snapshot());
        self.pending.clear();
        self.recorded = None;
        self.journaling = true;
        let result = self.apply(m, auto_done);
        self.journaling = false;

        let transfers = std::mem::take(&mut self.pending);
        let recorded = self.recorded.take();
        match result {
            Ok(confirmed) => {
                if let Some(undo) = m.undo.as_mut() {
                    undo.transfers = transfers;
                    undo.recorded_digest = recorded;
                    undo.auto_done = confirmed;
                }
                Ok(())
            }
            Err(e) => {
                if let Some(mut undo) = m.undo.take() {
                    undo.transfers = transfers;
                    if let Err(inner) = self.revert(undo) {
                        error!(%inner, "rollback after failed execute did not restore the board");
                        debug_assert!(false, "rollback failed: {inner}");
                    }
                }
                Err(e)
            }
        }
    }

    fn apply(&mut self, m: &mut MoveRecord, auto_done: bool) -> Result<bool, ExecError> {
        let turn_bound = !matches!(m.op, MoveOp::Start | MoveOp::Edit);
        if turn_bound && self.state != BoardState::Puzzle && m.player != self.whose_turn {
            return Err(ExecError::WrongPlayer {
                mover: m.player,
                to_move: self.whose_turn,
            });
        }

        match m.op {
            MoveOp::Start => self.start(m.player)?,
            MoveOp::Edit => self.edit()?,
            MoveOp::Done => self.done()?,
            MoveOp::Resign => self.resign()?,
            MoveOp::Null => self.null()?,
            MoveOp::Pass => self.pass()?,
            MoveOp::Pick | MoveOp::PickBoard => self.pick(m.source)?,
            MoveOp::Drop | MoveOp::DropBoard => self.drop(m.destination())?,
            MoveOp::Move => self.move_chip(m.source, m.destination())?,
            MoveOp::Custom(_) => {
                if !matches!(
                    self.state,
                    BoardState::Puzzle | BoardState::Play | BoardState::DrawPending
                ) {
                    return Err(self.illegal("custom").into());
                }
            }
        }

        R::apply_effects(self, m)?;

        if matches!(m.op, MoveOp::Custom(_))
            && matches!(self.state, BoardState::Play | BoardState::DrawPending)
        {
            self.state = BoardState::Confirm;
        }

        if auto_done && m.op != MoveOp::Done && self.state.is_done_state() {
            self.done()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn snapshot(&self) -> UndoInfo {
        UndoInfo {
            state: self.state,
            unresign: self.unresign,
            whose_turn: self.whose_turn,
            move_number: self.move_number,
            outcome: self.outcome,
            staging: self.staging.clone(),
            transfers: SmallVec::new(),
            recorded_digest: None,
            auto_done: false,
            aux: 0,
        }
    }

    fn revert(&mut self, undo: UndoInfo) -> Result<(), ExecError> {
        let was_journaling = std::mem::replace(&mut self.journaling, false);
        for t in undo.transfers.iter().rev() {
            let chip = self.lift(t.to)?;
            debug_assert_eq!(chip, t.chip, "journal out of step at {}", t.to);
            self.place(t.from, chip)?;
        }
        self.journaling = was_journaling;

        self.repeated.remove_since(undo.move_number + 1);
        self.state = undo.state;
        self.unresign = undo.unresign;
        self.whose_turn = undo.whose_turn;
        self.move_number = undo.move_number;
        self.outcome = undo.outcome;
        self.staging = undo.staging;
        Ok(())
    }

    /// Revert an executed record. Records must be reverted in reverse
    /// order of execution.
    pub fn un_execute(&mut self, m: &mut MoveRecord) -> Result<(), ExecError> {
        let Some(undo) = m.undo.take() else {
            return Err(ExecError::NotExecuted(m.to_string()));
        };
        self.revert(undo)
    }

    /// Forget the repetition entries made by `m` and anything after it.
    /// `un_execute` does this itself.
    pub fn remove_from_repeated_positions(&mut self, m: &MoveRecord) {
        if let Some(undo) = m.undo.as_ref() {
            self.repeated.remove_since(undo.move_number + 1);
        }
    }

    // === Digest ===

    fn location_key(&self, loc: Location) -> u64 {
        match loc {
            Location::Board(c) => self
                .layout
                .cell_id(c)
                .map_or(0, |id| self.keys.cell_salt(id.index())),
            Location::Pool { owner, slot } if self.layout.contains(loc) => {
                self.keys.pool_salt(self.layout.pool_index(owner, slot))
            }
            _ => 0,
        }
    }

    /// Deterministic summary of the position, staging and turn.
    #[must_use]
    pub fn digest(&self) -> u64 {
        let k = &self.keys;
        let mut v = 0u64;

        for (i, cell) in self.cells.iter().enumerate() {
            v ^= k.stack_digest(k.cell_salt(i), cell.chips());
        }
        for (owner, slots) in self.pools.iter() {
            for (slot, cell) in slots.iter().enumerate() {
                let salt = k.pool_salt(self.layout.pool_index(owner, slot as u8));
                v ^= k.stack_digest(salt, cell.chips());
            }
        }

        if let Some(chip) = self.staging.picked_object {
            v ^= k.chip_key(chip).wrapping_mul(k.picked_salt);
        }
        for (i, &loc) in self.staging.picked_source.iter().enumerate() {
            v ^= self
                .location_key(loc)
                .wrapping_mul(k.source_salt)
                .wrapping_mul(i as u64 + 1);
        }
        for (i, &loc) in self.staging.dropped_dest.iter().enumerate() {
            v ^= self
                .location_key(loc)
                .wrapping_mul(k.dest_salt)
                .wrapping_mul(i as u64 + 1);
        }

        v ^ k.turn_digest(self.state.ordinal(), self.whose_turn)
    }

    /// Check that `other` holds the same position. Used after clones and
    /// around make/unmake pairs.
    pub fn same_board(&self, other: &Self) -> Result<(), DigestMismatch> {
        let expected = self.digest();
        let actual = other.digest();
        if expected != actual {
            return Err(DigestMismatch {
                context: "same_board",
                expected,
                actual,
            });
        }
        let same_contents = self.cells == other.cells
            && self.pools == other.pools
            && self.staging == other.staging
            && self.state == other.state
            && self.whose_turn == other.whose_turn
            && self.move_number == other.move_number;
        if !same_contents {
            return Err(DigestMismatch {
                context: "same_board contents",
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Overwrite this board with a deep copy of `from`, reusing
    /// allocations.
    pub fn copy_from(&mut self, from: &Self) {
        self.rules = from.rules.clone();
        self.layout.clone_from(&from.layout);
        self.cells.clone_from(&from.cells);
        self.pools.clone_from(&from.pools);
        self.staging.clone_from(&from.staging);
        self.state = from.state;
        self.unresign = from.unresign;
        self.whose_turn = from.whose_turn;
        self.move_number = from.move_number;
        self.outcome = from.outcome;
        self.repeated.clone_from(&from.repeated);
        self.keys = Arc::clone(&from.keys);
        self.journaling = false;
        self.pending.clear();
        self.recorded = None;
    }

    /// Independent deep copy for a search workspace.
    #[must_use]
    pub fn clone_board(&self) -> Self {
        let mut copy = self.clone();
        copy.journaling = false;
        copy.pending.clear();
        debug_assert!(self.same_board(&copy).is_ok());
        copy
    }
}

impl<R: Rules> std::fmt::Debug for Board<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("state", &self.state)
            .field("whose_turn", &self.whose_turn)
            .field("move_number", &self.move_number)
            .field("outcome", &self.outcome)
            .field("staging", &self.staging)
            .field("digest", &format_args!("{:#018x}", self.digest()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two players, 3x1 strip, one pool slot each holding two chips.
    /// Player n owns chip n; chip 9 is neutral. Nobody ever wins.
    #[derive(Clone)]
    struct Strip {
        layout: BoardLayout,
    }

    impl Strip {
        fn new() -> Self {
            Self {
                layout: BoardLayout {
                    columns: 3,
                    rows: 1,
                    player_count: 2,
                    pool_slots: 1,
                    chip_kinds: 10,
                    digest_seed: 0x5717_1234,
                },
            }
        }
    }

    impl Rules for Strip {
        fn layout(&self) -> &BoardLayout {
            &self.layout
        }

        fn legal_moves(&self, _board: &Board<Self>, player: PlayerId) -> Vec<MoveRecord> {
            vec![MoveRecord::null(player)]
        }

        fn evaluate(&self, _board: &Board<Self>, _player: PlayerId) -> f64 {
            0.0
        }

        fn has_won(&self, _board: &Board<Self>, _player: PlayerId) -> bool {
            false
        }

        fn chip_owner(&self, chip: ChipId) -> Option<PlayerId> {
            (chip.0 < 2).then_some(PlayerId(chip.0 as u8))
        }

        fn can_drop(&self, board: &Board<Self>, _chip: ChipId, _from: Location, to: Location) -> bool {
            to.is_board() && board.top(to).is_none()
        }

        fn setup(board: &mut Board<Self>) {
            for p in PlayerId::all(2) {
                for _ in 0..2 {
                    board.add_chip(Location::pool(p, 0), ChipId(p.0 as u16)).unwrap();
                }
            }
        }
    }

    fn a1() -> Location {
        Location::board('A', 1)
    }

    fn p(n: u8) -> PlayerId {
        PlayerId(n)
    }

    fn playing() -> Board<Strip> {
        let mut b = Board::new(Strip::new());
        b.start(p(0)).unwrap();
        b
    }

    #[test]
    fn test_new_board_setup() {
        let b = Board::new(Strip::new());
        assert_eq!(b.state(), BoardState::Puzzle);
        assert_eq!(b.pool(p(0))[0].height(), 2);
        assert_eq!(b.move_number(), 1);
    }

    #[test]
    fn test_pick_and_drop_back_is_noop() {
        let mut b = Board::new(Strip::new());
        let before = b.digest();

        b.pick(Location::pool(p(0), 0)).unwrap();
        assert_ne!(b.digest(), before);
        assert_eq!(b.picked_object(), Some(ChipId(0)));

        b.drop(Location::pool(p(0), 0)).unwrap();
        assert_eq!(b.digest(), before);
        assert_eq!(b.state(), BoardState::Puzzle);
        assert!(b.staging().is_empty());
    }

    #[test]
    fn test_staged_drop_then_undrop() {
        let mut b = playing();
        let before = b.digest();

        b.pick(Location::pool(p(0), 0)).unwrap();
        b.drop(a1()).unwrap();
        assert_eq!(b.state(), BoardState::Confirm);
        assert_eq!(b.dropped_destination(), Some(a1()));

        // picking the dropped chip takes it back into the hand
        b.pick(a1()).unwrap();
        assert_eq!(b.state(), BoardState::Play);
        assert_eq!(b.dropped_destination(), None);
        b.unpick().unwrap();
        assert_eq!(b.digest(), before);
    }

    #[test]
    fn test_pick_rejects_opponent_and_empty() {
        let mut b = playing();
        assert_eq!(
            b.pick(Location::pool(p(1), 0)),
            Err(ExecError::Transition(TransitionError::NothingToPick(
                Location::pool(p(1), 0)
            )))
        );
        assert_eq!(
            b.pick(a1()),
            Err(ExecError::Transition(TransitionError::NothingToPick(a1())))
        );

        // neutral chips are anyone's
        b.edit().unwrap();
        b.add_chip(Location::board('C', 1), ChipId(9)).unwrap();
        b.start(p(0)).unwrap();
        assert!(b.pick(Location::board('C', 1)).is_ok());
    }

    #[test]
    fn test_drop_rejected_by_rules() {
        let mut b = playing();
        b.pick(Location::pool(p(0), 0)).unwrap();
        b.drop(a1()).unwrap();
        b.done().unwrap();

        b.pick(Location::pool(p(1), 0)).unwrap();
        let before = b.digest();
        assert_eq!(
            b.drop(a1()),
            Err(ExecError::Transition(TransitionError::IllegalDestination(a1())))
        );
        assert_eq!(b.digest(), before);
    }

    #[test]
    fn test_done_advances_turn() {
        let mut b = playing();
        b.pick(Location::pool(p(0), 0)).unwrap();
        b.drop(a1()).unwrap();
        b.done().unwrap();

        assert_eq!(b.whose_turn(), p(1));
        assert_eq!(b.move_number(), 2);
        assert_eq!(b.state(), BoardState::Play);
        assert!(b.staging().is_empty());
        assert_eq!(b.repeated_positions().count(b.digest()), 1);
    }

    #[test]
    fn test_done_illegal_in_play() {
        let mut b = playing();
        assert!(matches!(
            b.done(),
            Err(ExecError::Transition(TransitionError::IllegalTransition { action: "done", .. }))
        ));
    }

    #[test]
    fn test_resign_toggles() {
        let mut b = playing();
        b.resign().unwrap();
        assert_eq!(b.state(), BoardState::Resign);
        b.resign().unwrap();
        assert_eq!(b.state(), BoardState::Play);

        b.resign().unwrap();
        b.done().unwrap();
        assert_eq!(b.outcome(), Some(GameOutcome::Winner(p(1))));
        assert!(b.is_game_over());
    }

    #[test]
    fn test_execute_move_and_revert() {
        let mut b = playing();
        let before = b.digest();

        let mut m = MoveRecord::movement(p(0), Location::pool(p(0), 0), a1());
        b.robot_execute(&mut m).unwrap();
        assert_eq!(b.whose_turn(), p(1));
        assert_eq!(b.top(a1()), Some(ChipId(0)));
        assert!(m.undo_info().is_some_and(|u| u.auto_done()));

        b.un_execute(&mut m).unwrap();
        assert_eq!(b.digest(), before);
        assert!(b.repeated_positions().is_empty());
        assert!(m.undo_info().is_none());
    }

    #[test]
    fn test_stale_move_leaves_board_untouched() {
        let mut b = playing();
        let before = b.digest();

        let mut m = MoveRecord::movement(p(0), Location::board('B', 1), a1());
        assert_eq!(
            b.execute(&mut m),
            Err(ExecError::StaleMove(Location::board('B', 1)))
        );
        assert_eq!(b.digest(), before);
        assert!(m.undo_info().is_none());
    }

    #[test]
    fn test_wrong_player() {
        let mut b = playing();
        let mut m = MoveRecord::pass(p(1));
        assert_eq!(
            b.execute(&mut m),
            Err(ExecError::WrongPlayer {
                mover: p(1),
                to_move: p(0)
            })
        );
    }

    #[test]
    fn test_un_execute_requires_execution() {
        let mut b = playing();
        let mut m = MoveRecord::pass(p(0));
        assert!(matches!(b.un_execute(&mut m), Err(ExecError::NotExecuted(_))));
    }

    #[test]
    fn test_clone_is_same_board() {
        let mut b = playing();
        b.pick(Location::pool(p(0), 0)).unwrap();
        let c = b.clone_board();
        assert!(b.same_board(&c).is_ok());

        let mut d = Board::new(Strip::new());
        assert!(d.same_board(&b).is_err());
        d.copy_from(&b);
        assert!(d.same_board(&b).is_ok());
    }

    #[test]
    fn test_null_passes_turn() {
        let mut b = playing();
        let mut m = MoveRecord::null(p(0));
        b.execute(&mut m).unwrap();
        assert_eq!(b.whose_turn(), p(1));
        b.un_execute(&mut m).unwrap();
        assert_eq!(b.whose_turn(), p(0));
        assert_eq!(b.move_number(), 1);
    }
}
