//! Reference games.

pub mod tapatan;
