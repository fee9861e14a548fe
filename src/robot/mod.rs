//! Robot players.
//!
//! One worker thread per robot seat, each with its own board clone, RNG and
//! killer table. Nothing mutable is shared between robots.

pub mod worker;

pub use worker::{RobotReply, RobotWorker};
