//! Alpha-beta search for robot players.
//!
//! ## Overview
//!
//! - **Two players**: minimax with alpha-beta bounds, scored from seat 0's
//!   point of view. Consecutive moves by the same player are fine; every
//!   node simply maximises for whoever is to move.
//! - **More players**: maxn over per-seat score vectors.
//! - **Ordering**: static pre-evaluation of every candidate, then killer
//!   moves recorded at the same ply.
//! - **Early exit**: `good_enough_to_quit` ends a node as soon as the mover
//!   has a move worth at least the threshold.
//! - **Randomisation**: for the first plies, choose among near-best root
//!   moves instead of always the best.
//! - **Budgets**: node count, wall clock and an external cancel flag. A
//!   root move whose subtree was cut short is never chosen over a fully
//!   searched sibling.
//! - **Progressive deepening**: optional rounds of increasing depth; the
//!   previous round's best move is searched first, and an unfinished
//!   round falls back to the last finished one.
//!
//! ## Usage
//!
//! ```rust
//! use boardcore::board::Board;
//! use boardcore::games::tapatan::TapatanBuilder;
//! use boardcore::search::{SearchConfig, SearchDriver};
//! use boardcore::core::PlayerId;
//!
//! let mut board = Board::new(TapatanBuilder::new().build());
//! board.start(PlayerId::new(0)).unwrap();
//!
//! let mut workspace = board.clone_board();
//! let mut driver = SearchDriver::new(SearchConfig::default().with_max_depth(2));
//! let result = driver.find_static_best_move(&mut workspace).unwrap();
//! board.robot_execute(&mut result.best.clone()).unwrap();
//! ```

pub mod config;
pub mod driver;
pub mod killer;
pub mod node;
pub mod stats;

pub use config::{RandomizationWindow, SearchConfig};
pub use driver::{SearchDriver, SearchResult};
pub use killer::KillerTable;
pub use node::Scores;
pub use stats::SearchStats;
