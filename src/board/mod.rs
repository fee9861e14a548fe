//! Board state machine and undo journal.
//!
//! ## States
//!
//! ```text
//!   Puzzle --Start--> Play --pick/drop, Move--> Confirm --Done--> Play
//!                      |  ^                         |
//!                      |  +-------- undrop ---------+
//!                      +--Resign--> Resign --Done--> GameOver
//!   Done that repeats a position --> DrawPending --Done--> GameOver (draw)
//! ```
//!
//! The staged pick/drop slot lives on the board aggregate and refers to
//! cells by location, never by flags inside a cell, so clones cannot alias
//! staging state.

#[allow(clippy::module_inception)]
pub mod board;
pub mod cell;
pub mod journal;
pub mod state;

pub use board::Board;
pub use cell::Cell;
pub use journal::{Staging, Transfer, UndoInfo};
pub use state::BoardState;
