//! Move operations and the name ↔ opcode table.
//!
//! The standard vocabulary is shared by every game. Games add their own
//! operations as `MoveOp::Custom(code)` and name them through a `const`
//! table, so the mapping is fixed at compile time and never mutated.
//!
//! ```
//! use boardcore::moves::{MoveOp, OpcodeTable};
//!
//! const SLIDERS: OpcodeTable = OpcodeTable::with_custom(&[("Slide", 0), ("Jump", 1)]);
//!
//! assert_eq!(SLIDERS.lookup("dropb"), Some(MoveOp::DropBoard));
//! assert_eq!(SLIDERS.lookup("Jump"), Some(MoveOp::Custom(1)));
//! assert_eq!(SLIDERS.name(MoveOp::Custom(0)), Some("Slide"));
//! ```

use serde::{Deserialize, Serialize};

/// Tagged move kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOp {
    /// Set the player to move and enter play.
    Start,
    /// Confirm the staged move and end the turn.
    Done,
    /// Return to free placement.
    Edit,
    /// Toggle resignation; confirmed by `Done`.
    Resign,
    /// Hand the turn over without touching the board.
    Null,
    /// Stage an explicit pass; confirmed by `Done`.
    Pass,
    /// Pick a chip from a reserve pool.
    Pick,
    /// Drop the picked chip onto a reserve pool.
    Drop,
    /// Pick a chip from a board cell.
    PickBoard,
    /// Drop the picked chip onto a board cell.
    DropBoard,
    /// Complete pick + drop in one record: source, then 1..=3 targets.
    Move,
    /// Game-specific operation, named by the game's table.
    Custom(u16),
}

/// Argument tokens an operation takes after its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgShape {
    Nothing,
    /// One `P<n>` token.
    Player,
    /// One location, board or pool.
    Location,
    /// One board coordinate.
    BoardCell,
    /// A source location followed by one to three target locations.
    SourceAndTargets,
    /// Any number of locations; the first, if present, is the source.
    Locations,
}

/// Most targets a single move may carry.
pub const MAX_TARGETS: usize = 3;

const STANDARD_OPS: [(&str, MoveOp); 11] = [
    ("Done", MoveOp::Done),
    ("Edit", MoveOp::Edit),
    ("Start", MoveOp::Start),
    ("Resign", MoveOp::Resign),
    ("Null", MoveOp::Null),
    ("Pass", MoveOp::Pass),
    ("Pick", MoveOp::Pick),
    ("Drop", MoveOp::Drop),
    ("Pickb", MoveOp::PickBoard),
    ("Dropb", MoveOp::DropBoard),
    ("Move", MoveOp::Move),
];

impl MoveOp {
    /// Argument shape for parsing and serializing.
    #[must_use]
    pub const fn shape(self) -> ArgShape {
        match self {
            MoveOp::Done | MoveOp::Edit | MoveOp::Resign | MoveOp::Null | MoveOp::Pass => {
                ArgShape::Nothing
            }
            MoveOp::Start => ArgShape::Player,
            MoveOp::Pick | MoveOp::Drop => ArgShape::Location,
            MoveOp::PickBoard | MoveOp::DropBoard => ArgShape::BoardCell,
            MoveOp::Move => ArgShape::SourceAndTargets,
            MoveOp::Custom(_) => ArgShape::Locations,
        }
    }

    /// Integer opcode. Standard operations are negative, custom ones are
    /// their own non-negative code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            MoveOp::Done => -1,
            MoveOp::Edit => -2,
            MoveOp::Start => -3,
            MoveOp::Resign => -4,
            MoveOp::Null => -5,
            MoveOp::Pass => -6,
            MoveOp::Pick => -7,
            MoveOp::Drop => -8,
            MoveOp::PickBoard => -9,
            MoveOp::DropBoard => -10,
            MoveOp::Move => -11,
            MoveOp::Custom(c) => c as i32,
        }
    }

    /// Inverse of [`MoveOp::code`].
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        if code >= 0 {
            return u16::try_from(code).ok().map(MoveOp::Custom);
        }
        STANDARD_OPS
            .iter()
            .map(|&(_, op)| op)
            .find(|op| op.code() == code)
    }
}

/// Bidirectional operation name table for one game.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeTable {
    custom: &'static [(&'static str, u16)],
}

impl OpcodeTable {
    /// Standard operations only.
    pub const STANDARD: OpcodeTable = OpcodeTable { custom: &[] };

    /// Standard operations plus the game's own.
    #[must_use]
    pub const fn with_custom(custom: &'static [(&'static str, u16)]) -> Self {
        Self { custom }
    }

    /// Operation for a name, ignoring ASCII case.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<MoveOp> {
        STANDARD_OPS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, op)| op)
            .or_else(|| {
                self.custom
                    .iter()
                    .find(|(n, _)| n.eq_ignore_ascii_case(name))
                    .map(|&(_, code)| MoveOp::Custom(code))
            })
    }

    /// Canonical name for an operation.
    #[must_use]
    pub fn name(&self, op: MoveOp) -> Option<&'static str> {
        match op {
            MoveOp::Custom(code) => self
                .custom
                .iter()
                .find(|&&(_, c)| c == code)
                .map(|&(n, _)| n),
            _ => STANDARD_OPS
                .iter()
                .find(|&&(_, o)| o == op)
                .map(|&(n, _)| n),
        }
    }

    /// Check that no custom name shadows another name or reuses a code.
    pub fn validate(&self) -> Result<(), String> {
        for (i, &(name, code)) in self.custom.iter().enumerate() {
            if STANDARD_OPS.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
                return Err(format!("custom opcode {name:?} shadows a standard name"));
            }
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(format!("custom opcode {name:?} must be alphabetic"));
            }
            for &(other, other_code) in &self.custom[i + 1..] {
                if other.eq_ignore_ascii_case(name) {
                    return Err(format!("custom opcode {name:?} is listed twice"));
                }
                if other_code == code {
                    return Err(format!("opcode {code} is used by {name:?} and {other:?}"));
                }
            }
        }
        Ok(())
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::STANDARD
    }
}
