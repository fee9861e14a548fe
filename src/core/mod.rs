//! Core value types shared by every game: seats, locations, chips, RNG.
//!
//! These carry no rules. Games give them meaning through the `Rules`
//! collaborator.

pub mod location;
pub mod player;
pub mod rng;

pub use location::{CellId, ChipId, Coord, Location};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
