//! Typed places a chip can be: a board cell, a reserve pool slot, or
//! nowhere (the picked-up slot, or "no location" for moves like `Done`).
//!
//! Locations are pure coordinates. Mapping a `Coord` onto a cell index is
//! the board's job, so a move can be fully specified without a board.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Identifier of a chip (piece) kind. Games assign meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChipId(pub u16);

impl ChipId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable index of a board cell inside one board layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u16);

impl CellId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Board coordinate: column letter (`'A'..`) and 1-based row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub col: char,
    pub row: u8,
}

impl Coord {
    #[must_use]
    pub const fn new(col: char, row: u8) -> Self {
        Self { col, row }
    }

    /// Zero-based column number, `None` for non-letters.
    #[must_use]
    pub fn col_index(self) -> Option<usize> {
        self.col
            .is_ascii_uppercase()
            .then(|| (self.col as u8 - b'A') as usize)
    }

    /// Coordinate offset by (dcol, drow), if it stays in `A..=Z` and rows >= 1.
    #[must_use]
    pub fn offset(self, dcol: i32, drow: i32) -> Option<Self> {
        let col = self.col_index()? as i32 + dcol;
        let row = self.row as i32 + drow;
        if !(0..26).contains(&col) || !(1..=255).contains(&row) {
            return None;
        }
        Some(Self::new((b'A' + col as u8) as char, row as u8))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.col, self.row)
    }
}

/// Where a chip comes from or goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// A cell on the main board.
    Board(Coord),
    /// Slot `slot` of `owner`'s reserve pool.
    Pool { owner: PlayerId, slot: u8 },
    /// No location. Also stands for the picked-up slot in transfer journals.
    Nowhere,
}

impl Location {
    #[must_use]
    pub const fn board(col: char, row: u8) -> Self {
        Location::Board(Coord::new(col, row))
    }

    #[must_use]
    pub const fn pool(owner: PlayerId, slot: u8) -> Self {
        Location::Pool { owner, slot }
    }

    #[must_use]
    pub const fn is_board(self) -> bool {
        matches!(self, Location::Board(_))
    }

    #[must_use]
    pub const fn is_nowhere(self) -> bool {
        matches!(self, Location::Nowhere)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Board(c) => write!(f, "{c}"),
            Location::Pool { owner, slot } => write!(f, "{owner} {slot}"),
            Location::Nowhere => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_offset() {
        let c = Coord::new('B', 2);
        assert_eq!(c.offset(1, 1), Some(Coord::new('C', 3)));
        assert_eq!(c.offset(-1, -1), Some(Coord::new('A', 1)));
        assert_eq!(c.offset(-2, 0), None);
        assert_eq!(c.offset(0, -2), None);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::board('C', 4).to_string(), "C 4");
        assert_eq!(Location::pool(PlayerId(1), 0).to_string(), "P1 0");
        assert_eq!(Location::Nowhere.to_string(), "-");
    }

    #[test]
    fn test_col_index_rejects_lowercase() {
        assert_eq!(Coord::new('a', 1).col_index(), None);
        assert_eq!(Coord::new('D', 1).col_index(), Some(3));
    }
}
