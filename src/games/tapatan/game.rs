//! Tapatan rules.

use crate::board::{Board, BoardState};
use crate::core::{ChipId, Coord, Location, PlayerId};
use crate::error::ExecError;
use crate::moves::{MoveOp, MoveRecord, OpcodeTable};
use crate::rules::{BoardLayout, Rules};

/// Custom opcode: jump one of your chips over an adjacent chip onto the
/// empty cell behind it.
pub const JUMP: u16 = 0;

const OPCODES: OpcodeTable = OpcodeTable::with_custom(&[("Jump", JUMP)]);

/// Fixed digest seed. Changing it changes every stored digest.
const TAPATAN_DIGEST_SEED: u64 = 0x7A9A_7A40_0000_0003;

const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const LINES: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Tapatan rules for one board size and player count.
#[derive(Clone, Debug)]
pub struct Tapatan {
    layout: BoardLayout,
    chips_per_player: usize,
    line_length: usize,
}

/// Builder for creating a Tapatan game.
pub struct TapatanBuilder {
    columns: u8,
    rows: u8,
    player_count: usize,
    chips_per_player: usize,
    line_length: usize,
}

impl Default for TapatanBuilder {
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 3,
            player_count: 2,
            chips_per_player: 3,
            line_length: 3,
        }
    }
}

impl TapatanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: u8) -> Self {
        assert!((1..=26).contains(&columns), "Columns must be 1-26");
        self.columns = columns;
        self
    }

    pub fn rows(mut self, rows: u8) -> Self {
        assert!(rows >= 1, "Rows must be at least 1");
        self.rows = rows;
        self
    }

    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=4).contains(&count), "Player count must be 2-4");
        self.player_count = count;
        self
    }

    pub fn chips_per_player(mut self, count: usize) -> Self {
        self.chips_per_player = count;
        self
    }

    pub fn line_length(mut self, length: usize) -> Self {
        assert!(length >= 2, "Lines must be at least 2 long");
        self.line_length = length;
        self
    }

    pub fn build(self) -> Tapatan {
        Tapatan {
            layout: BoardLayout {
                columns: self.columns,
                rows: self.rows,
                player_count: self.player_count,
                pool_slots: 1,
                chip_kinds: self.player_count as u16,
                digest_seed: TAPATAN_DIGEST_SEED,
            },
            chips_per_player: self.chips_per_player,
            line_length: self.line_length,
        }
    }
}

impl Tapatan {
    /// The chip kind a player owns.
    #[must_use]
    pub fn chip(player: PlayerId) -> ChipId {
        ChipId(player.0 as u16)
    }

    /// A player's reserve.
    #[must_use]
    pub fn reserve(player: PlayerId) -> Location {
        Location::pool(player, 0)
    }

    #[must_use]
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    fn is_empty_cell(board: &Board<Self>, coord: Coord) -> bool {
        board
            .cell_at(Location::Board(coord))
            .is_some_and(|c| c.is_empty())
    }

    fn is_occupied_cell(board: &Board<Self>, coord: Coord) -> bool {
        board
            .cell_at(Location::Board(coord))
            .is_some_and(|c| !c.is_empty())
    }

    /// Tops of the cells of the line starting at `start` going (dc, dr),
    /// or `None` if it leaves the board.
    fn window(&self, board: &Board<Self>, start: Coord, (dc, dr): (i32, i32)) -> Option<Vec<Option<ChipId>>> {
        (0..self.line_length as i32)
            .map(|i| {
                let c = start.offset(dc * i, dr * i)?;
                board.cell_at(Location::Board(c)).map(|cell| cell.top())
            })
            .collect()
    }

    fn play_moves(&self, board: &Board<Self>, player: PlayerId) -> Vec<MoveRecord> {
        let mut moves = Vec::new();
        if let Some(chip) = board.picked_object() {
            let from = board.picked_source().unwrap_or(Location::Nowhere);
            for coord in self.layout.coords() {
                let to = Location::Board(coord);
                if self.can_drop(board, chip, from, to) {
                    moves.push(MoveRecord::drop(player, to));
                }
            }
            if let Some(src) = board.picked_source() {
                moves.push(MoveRecord::drop(player, src));
            }
            return moves;
        }

        if board.top(Self::reserve(player)).is_some() {
            Self::placements(board, player, &mut moves);
        } else {
            Self::steps_and_jumps(board, player, &mut moves);
        }
        if moves.is_empty() {
            moves.push(MoveRecord::pass(player));
        }
        moves
    }

    fn placements(board: &Board<Self>, player: PlayerId, out: &mut Vec<MoveRecord>) {
        for (coord, cell) in board.board_cells() {
            if cell.is_empty() {
                out.push(MoveRecord::movement(
                    player,
                    Self::reserve(player),
                    Location::Board(coord),
                ));
            }
        }
    }

    fn steps_and_jumps(board: &Board<Self>, player: PlayerId, out: &mut Vec<MoveRecord>) {
        let own = Some(Self::chip(player));
        for (from, cell) in board.board_cells() {
            if cell.top() != own {
                continue;
            }
            for (dc, dr) in NEIGHBOURS {
                let Some(next) = from.offset(dc, dr) else {
                    continue;
                };
                if Self::is_empty_cell(board, next) {
                    out.push(MoveRecord::movement(
                        player,
                        Location::Board(from),
                        Location::Board(next),
                    ));
                } else if Self::is_occupied_cell(board, next) {
                    if let Some(landing) = from.offset(2 * dc, 2 * dr) {
                        if Self::is_empty_cell(board, landing) {
                            out.push(MoveRecord::custom(
                                JUMP,
                                player,
                                &[Location::Board(from), Location::Board(landing)],
                            ));
                        }
                    }
                }
            }
        }
    }
}

fn adjacent(a: Coord, b: Coord) -> bool {
    NEIGHBOURS.iter().any(|&(dc, dr)| a.offset(dc, dr) == Some(b))
}

impl Rules for Tapatan {
    fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    fn legal_moves(&self, board: &Board<Self>, player: PlayerId) -> Vec<MoveRecord> {
        match board.state() {
            BoardState::GameOver => Vec::new(),
            BoardState::Puzzle => vec![MoveRecord::start(player)],
            BoardState::Confirm | BoardState::Resign => vec![MoveRecord::done(player)],
            // accept the draw, or play on
            BoardState::DrawPending => {
                let mut moves = vec![MoveRecord::done(player)];
                moves.extend(
                    self.play_moves(board, player)
                        .into_iter()
                        .filter(|m| m.op != MoveOp::Pass),
                );
                moves
            }
            BoardState::Play => self.play_moves(board, player),
        }
    }

    /// Sum of squared chip counts over every line the player still
    /// shares with nobody.
    fn evaluate(&self, board: &Board<Self>, player: PlayerId) -> f64 {
        let own = Self::chip(player);
        let mut score = 0.0;
        for start in self.layout.coords() {
            for dir in LINES {
                let Some(window) = self.window(board, start, dir) else {
                    continue;
                };
                let mine = window.iter().filter(|t| **t == Some(own)).count();
                let theirs = window.iter().filter(|t| matches!(t, Some(c) if *c != own)).count();
                if theirs == 0 {
                    score += (mine * mine) as f64;
                }
            }
        }
        score
    }

    fn has_won(&self, board: &Board<Self>, player: PlayerId) -> bool {
        let own = Some(Self::chip(player));
        self.layout.coords().any(|start| {
            LINES.iter().any(|&dir| {
                self.window(board, start, dir)
                    .is_some_and(|w| w.iter().all(|t| *t == own))
            })
        })
    }

    fn chip_owner(&self, chip: ChipId) -> Option<PlayerId> {
        (chip.index() < self.layout.player_count).then(|| PlayerId(chip.0 as u8))
    }

    fn can_drop(&self, board: &Board<Self>, _chip: ChipId, from: Location, to: Location) -> bool {
        let Location::Board(dest) = to else {
            return false;
        };
        if !Self::is_empty_cell(board, dest) {
            return false;
        }
        match from {
            Location::Board(src) => {
                let placing = board.top(Self::reserve(board.whose_turn())).is_some();
                !placing && adjacent(src, dest)
            }
            _ => true,
        }
    }

    fn opcodes(&self) -> OpcodeTable {
        OPCODES
    }

    fn setup(board: &mut Board<Self>) {
        let count = board.rules().chips_per_player;
        for player in PlayerId::all(board.player_count()) {
            for _ in 0..count {
                // the reserve always exists on this layout
                let _ = board.add_chip(Self::reserve(player), Self::chip(player));
            }
        }
    }

    fn apply_effects(board: &mut Board<Self>, m: &mut MoveRecord) -> Result<(), ExecError> {
        if m.op == MoveOp::Custom(JUMP) {
            board.transfer(m.source, m.destination())?;
        }
        Ok(())
    }
}
