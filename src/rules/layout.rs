//! Board geometry supplied by a game.

use serde::{Deserialize, Serialize};

use crate::core::{CellId, Coord, Location, PlayerId};

/// Rectangular grid plus per-player reserve pools.
///
/// `digest_seed` must be a literal constant in the game definition so that
/// digests are identical across runs and builds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Columns, lettered from `A`. At most 26.
    pub columns: u8,
    /// Rows, numbered from 1.
    pub rows: u8,
    pub player_count: usize,
    /// Pool slots per player.
    pub pool_slots: u8,
    /// Number of distinct chip kinds that get a dedicated digest key.
    pub chip_kinds: u16,
    pub digest_seed: u64,
}

impl BoardLayout {
    /// Check that every cell has a lettered column and that the board has
    /// at least one cell and one player.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=26).contains(&self.columns) {
            return Err(format!("{} columns, must be 1-26", self.columns));
        }
        if self.rows == 0 {
            return Err("a board needs at least one row".to_string());
        }
        if self.player_count == 0 {
            return Err("a board needs at least one player".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Index of a board coordinate, `None` if off the board.
    #[must_use]
    pub fn cell_id(&self, coord: Coord) -> Option<CellId> {
        let col = coord.col_index()?;
        if col >= self.columns as usize || coord.row == 0 || coord.row > self.rows {
            return None;
        }
        let idx = (coord.row as usize - 1) * self.columns as usize + col;
        Some(CellId(idx as u16))
    }

    #[must_use]
    pub fn coord(&self, cell: CellId) -> Coord {
        let cols = self.columns as usize;
        let col = (cell.index() % cols) as u8;
        let row = (cell.index() / cols) as u8 + 1;
        Coord::new((b'A' + col) as char, row)
    }

    /// Every board coordinate, row-major from `A 1`.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cell_count()).map(move |i| self.coord(CellId(i as u16)))
    }

    /// True if `loc` names a board cell or pool slot of this layout.
    #[must_use]
    pub fn contains(&self, loc: Location) -> bool {
        match loc {
            Location::Board(c) => self.cell_id(c).is_some(),
            Location::Pool { owner, slot } => {
                owner.index() < self.player_count && slot < self.pool_slots
            }
            Location::Nowhere => false,
        }
    }

    /// Flat index of a pool slot across all players.
    #[must_use]
    pub(crate) fn pool_index(&self, owner: PlayerId, slot: u8) -> usize {
        owner.index() * self.pool_slots as usize + slot as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BoardLayout {
        BoardLayout {
            columns: 4,
            rows: 3,
            player_count: 2,
            pool_slots: 1,
            chip_kinds: 2,
            digest_seed: 1,
        }
    }

    #[test]
    fn test_cell_ids_round_trip() {
        let l = layout();
        for (i, c) in l.coords().enumerate() {
            assert_eq!(l.cell_id(c), Some(CellId(i as u16)));
        }
        assert_eq!(l.coord(CellId(0)), Coord::new('A', 1));
        assert_eq!(l.coord(CellId(5)), Coord::new('B', 2));
    }

    #[test]
    fn test_validate() {
        assert!(layout().validate().is_ok());
        assert!(BoardLayout { columns: 26, ..layout() }.validate().is_ok());
        assert!(BoardLayout { columns: 27, ..layout() }.validate().is_err());
        assert!(BoardLayout { columns: 0, ..layout() }.validate().is_err());
        assert!(BoardLayout { rows: 0, ..layout() }.validate().is_err());
        assert!(BoardLayout { player_count: 0, ..layout() }.validate().is_err());
    }

    #[test]
    fn test_contains() {
        let l = layout();
        assert!(l.contains(Location::board('D', 3)));
        assert!(!l.contains(Location::board('E', 1)));
        assert!(!l.contains(Location::board('A', 4)));
        assert!(!l.contains(Location::board('A', 0)));
        assert!(l.contains(Location::pool(PlayerId(1), 0)));
        assert!(!l.contains(Location::pool(PlayerId(2), 0)));
        assert!(!l.contains(Location::pool(PlayerId(0), 1)));
        assert!(!l.contains(Location::Nowhere));
    }
}
