//! Error taxonomy.
//!
//! - `MoveError`: parse-time, recoverable. Reject the input, state untouched.
//! - `TransitionError`: state-machine time, recoverable. Surfaced to the UI
//!   as a rejected action.
//! - `ExecError`: applying or reverting a move record. All-or-nothing.
//! - `SearchError`: invariant violations inside a robot search. Fatal to
//!   that search; the caller falls back to a safe move.
//! - `SessionError`: boundary errors for a live game session.
//! - `ReplayError`: a stored move log that does not read back, by line.

use crate::board::BoardState;
use crate::core::{Location, PlayerId};

/// Parse failure for a textual move.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("malformed move {text:?}: {reason}")]
    MalformedMove { text: String, reason: String },
}

impl MoveError {
    pub(crate) fn malformed(text: &str, reason: impl Into<String>) -> Self {
        MoveError::MalformedMove {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// A staged action the board refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("nothing the mover can pick at {0}")]
    NothingToPick(Location),

    #[error("cannot drop at {0}")]
    IllegalDestination(Location),

    #[error("{action} is not allowed in state {state:?}")]
    IllegalTransition {
        action: &'static str,
        state: BoardState,
    },
}

/// Failure to execute or revert a move record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// The move's source no longer holds a chip. The move list was stale.
    #[error("stale move: source {0} is empty")]
    StaleMove(Location),

    #[error("location {0} is not on this board")]
    OffBoard(Location),

    #[error("move {0} was never executed on this board")]
    NotExecuted(String),

    #[error("move belongs to {mover}, but it is {to_move}'s turn")]
    WrongPlayer { mover: PlayerId, to_move: PlayerId },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Clone or unwind verification failed. Must never happen in correct code.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("digest mismatch ({context}): expected {expected:#018x}, got {actual:#018x}")]
pub struct DigestMismatch {
    pub context: &'static str,
    pub expected: u64,
    pub actual: u64,
}

/// Fatal search failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The rules returned no moves for a position that is not over.
    #[error("no legal moves for {player} in non-terminal state {state:?} at ply {ply}")]
    NoMovesInNonTerminalState {
        player: PlayerId,
        state: BoardState,
        ply: u32,
    },

    #[error("search started on a finished game")]
    TerminalPosition,

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    DigestMismatch(#[from] DigestMismatch),
}

/// Errors at the session boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A remote peer sent something we cannot apply. The session no longer
    /// mirrors the peer's board.
    #[error("session desynchronized: {0}")]
    Desynchronized(String),

    /// A local action was refused. Nothing changed.
    #[error("action rejected: {0}")]
    Rejected(#[from] TransitionError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("no robot is attached to {0}")]
    NoRobot(PlayerId),

    #[error("robot for {0} is not running")]
    RobotUnavailable(PlayerId),

    /// The robot answered for a position that is no longer on the board.
    #[error("robot reply for {0} was computed on a different position")]
    StaleReply(PlayerId),
}

/// A textual move log could not be read back or replayed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("line {line}: {reason}")]
    BadLine { line: usize, reason: String },

    #[error("line {line}: {source}")]
    Parse { line: usize, source: MoveError },

    #[error("line {line}: {source}")]
    Apply { line: usize, source: ExecError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = MoveError::malformed("Frob A 1", "unknown operation \"Frob\"");
        assert_eq!(
            e.to_string(),
            "malformed move \"Frob A 1\": unknown operation \"Frob\""
        );

        let e = ExecError::StaleMove(Location::board('B', 2));
        assert_eq!(e.to_string(), "stale move: source B 2 is empty");

        let d = DigestMismatch {
            context: "unwind",
            expected: 1,
            actual: 2,
        };
        assert!(d.to_string().starts_with("digest mismatch (unwind)"));
    }

    #[test]
    fn test_from_conversions() {
        let t = TransitionError::IllegalDestination(Location::Nowhere);
        let e: ExecError = t.clone().into();
        assert_eq!(e, ExecError::Transition(t));

        let s: SearchError = e.into();
        assert!(matches!(s, SearchError::Exec(ExecError::Transition(_))));
    }
}
