//! Tapatan, a three-in-a-row placement and movement game.
//!
//! Used as the reference game for the engine:
//! - Each player starts with 3 chips in reserve
//! - While you have reserve chips, place one on any empty cell
//! - Afterwards, step a chip to an adjacent empty cell (diagonals count)
//!   or jump it over an adjacent chip onto the empty cell behind
//! - Three of your chips in a line wins
//! - A player with no move passes
//!
//! Board size, line length and seat count (2-4) are configurable, so the
//! same rules exercise maxn search on bigger boards.

mod game;

pub use game::{Tapatan, TapatanBuilder, JUMP};
