//! Rules collaborator for game implementations.
//!
//! Games implement `Rules` to define:
//! - Board geometry (`BoardLayout`)
//! - Legal moves and static evaluation
//! - Win conditions and execution side effects
//!
//! The board and the search call into `Rules` but never interpret
//! game-specific concepts directly.

pub mod engine;
pub mod layout;

pub use engine::{GameOutcome, Rules};
pub use layout::BoardLayout;
