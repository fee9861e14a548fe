//! Move records and their textual form.
//!
//! - `opcode`: the operation vocabulary and the per-game name table
//! - `record`: `MoveRecord`, comparison by specified move
//! - `codec`: `parse` / `serialize` for the line protocol
//! - `log`: ordered game record with text round-trip and replay

pub mod codec;
pub mod log;
pub mod opcode;
pub mod record;

pub use log::MoveLog;
pub use opcode::{ArgShape, MoveOp, OpcodeTable, MAX_TARGETS};
pub use record::MoveRecord;
