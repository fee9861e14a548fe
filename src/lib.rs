//! # boardcore
//!
//! Shared core for turn-based board games: a staged board state machine,
//! reversible move records, position digests and an alpha-beta robot.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: The board knows cells, stacks of chips and reserve
//!    pools. Everything game specific lives behind the `Rules` trait.
//!
//! 2. **N-Player First**: Turn order, score vectors and reserves are per
//!    seat. Two players is a special case of the search, not of the board.
//!
//! 3. **Reversible**: Every executed move can be taken back exactly, and
//!    the digest proves it.
//!
//! ## Architecture
//!
//! - **Staged moves**: A human turn is pick, drop, then done. Robots apply
//!   whole move records and auto-confirm.
//!
//! - **Undo journal**: Execution snapshots the scalar state and records
//!   chip transfers; reverting replays them backwards.
//!
//! - **Thread-confined search**: Each robot searches its own board clone on
//!   its own thread. Only the cancel flag is shared.
//!
//! ## Modules
//!
//! - `core`: Seats, locations, chips, RNG
//! - `moves`: Move records, the protocol codec, move logs
//! - `board`: The board state machine and undo journal
//! - `digest`: Position digests and the repetition table
//! - `rules`: The `Rules` trait and board layout
//! - `search`: Alpha-beta / maxn search driver
//! - `robot`: Robot worker threads
//! - `session`: A live game with history and robot seats
//! - `games`: Reference games

pub mod board;
pub mod core;
pub mod digest;
pub mod error;
pub mod games;
pub mod moves;
pub mod robot;
pub mod rules;
pub mod search;
pub mod session;

// Re-export commonly used types
pub use crate::core::{CellId, ChipId, Coord, GameRng, Location, PlayerId, PlayerMap};

pub use crate::board::{Board, BoardState, Cell, Staging, Transfer, UndoInfo};

pub use crate::moves::{ArgShape, MoveLog, MoveOp, MoveRecord, OpcodeTable};

pub use crate::digest::{DigestKeys, RepeatedPositions};

pub use crate::rules::{BoardLayout, GameOutcome, Rules};

pub use crate::search::{
    RandomizationWindow, SearchConfig, SearchDriver, SearchResult, SearchStats,
};

pub use crate::robot::{RobotReply, RobotWorker};

pub use crate::session::GameSession;

pub use crate::error::{
    DigestMismatch, ExecError, MoveError, ReplayError, SearchError, SessionError,
    TransitionError,
};
