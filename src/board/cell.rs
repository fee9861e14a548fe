//! A cell is a stack of chips. Board cells and pool slots share the type.
//!
//! Cells carry no flags and no salts: staging lives on the board aggregate
//! and digest salts live in the shared key table, both keyed by index.

use smallvec::SmallVec;

use crate::core::ChipId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    stack: SmallVec<[ChipId; 4]>,
}

impl Cell {
    #[must_use]
    pub fn top(&self) -> Option<ChipId> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Chips bottom to top.
    #[must_use]
    pub fn chips(&self) -> &[ChipId] {
        &self.stack
    }

    pub(crate) fn push(&mut self, chip: ChipId) {
        self.stack.push(chip);
    }

    pub(crate) fn pop(&mut self) -> Option<ChipId> {
        self.stack.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }
}
