//! Position digests.
//!
//! A digest is a 64-bit xor of per-cell stack contributions, pool
//! contributions, staged pick/drop values and the (state, player to move)
//! pair, each multiplied by a fixed salt. It serves three purposes that
//! must not be mixed up:
//!
//! 1. **Repetition**: confirmed positions are counted in
//!    [`RepeatedPositions`]; a repeat turns the board to `DrawPending`.
//! 2. **Verification**: clones and make/unmake pairs are cross-checked with
//!    `Board::same_board`.
//! 3. **Duplicate games**: the final digest of a game can be compared
//!    against stored games by whoever persists them.

pub mod keys;
pub mod repetition;

pub use keys::DigestKeys;
pub use repetition::RepeatedPositions;
