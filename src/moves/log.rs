//! Textual game record.
//!
//! A log is the ordered list of moves a game went through, each tagged with
//! its mover. It is the only persistence format the core knows about:
//!
//! ```text
//! P0 Start P0
//! P0 Move P0 0 B 2
//! P0 Done
//! ```
//!
//! History is an `im::Vector`, so handing a copy of it to a robot or a
//! viewer is O(1).

use im::Vector;

use crate::board::Board;
use crate::core::PlayerId;
use crate::error::ReplayError;
use crate::rules::Rules;

use super::opcode::OpcodeTable;
use super::record::MoveRecord;

/// Ordered move history.
#[derive(Clone, Debug, Default)]
pub struct MoveLog {
    moves: Vector<MoveRecord>,
}

impl MoveLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move. Bookkeeping is stripped and the sequence index is set
    /// to the move's position in the log.
    pub fn push(&mut self, m: &MoveRecord) {
        let index = self.moves.len() as u32;
        self.moves.push_back(m.specification().with_index(index));
    }

    /// Drop the last move, if any.
    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.moves.pop_back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&MoveRecord> {
        self.moves.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.iter()
    }

    /// One `P<n> <move>` line per move. Sequence numbers are left out; they
    /// are implied by line order.
    #[must_use]
    pub fn to_text(&self, table: &OpcodeTable) -> String {
        let mut out = String::new();
        for m in &self.moves {
            let mut bare = m.clone();
            bare.index = None;
            out.push_str(&format!("{} {}\n", m.player, bare.serialize(table)));
        }
        out
    }

    /// Read a log back. Blank lines are skipped; line numbers in errors are
    /// 1-based.
    pub fn parse_text(text: &str, table: &OpcodeTable) -> Result<Self, ReplayError> {
        let mut log = MoveLog::new();
        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let (who, rest) = raw.split_once(char::is_whitespace).ok_or_else(|| {
                ReplayError::BadLine {
                    line,
                    reason: "expected a player and a move".to_string(),
                }
            })?;
            let player = PlayerId::from_token(who).ok_or_else(|| ReplayError::BadLine {
                line,
                reason: format!("bad player {who:?}"),
            })?;
            let m = MoveRecord::parse(rest, player, table)
                .map_err(|source| ReplayError::Parse { line, source })?;
            log.push(&m);
        }
        Ok(log)
    }

    /// Apply every move, in order, to `board`.
    ///
    /// Stops at the first move the board refuses. Moves before it stay
    /// applied.
    pub fn replay<R: Rules>(&self, board: &mut Board<R>) -> Result<(), ReplayError> {
        for (i, m) in self.moves.iter().enumerate() {
            let mut m = m.clone();
            board
                .execute(&mut m)
                .map_err(|source| ReplayError::Apply { line: i + 1, source })?;
        }
        Ok(())
    }
}

impl FromIterator<MoveRecord> for MoveLog {
    fn from_iter<I: IntoIterator<Item = MoveRecord>>(iter: I) -> Self {
        let mut log = MoveLog::new();
        for m in iter {
            log.push(&m);
        }
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Location;

    #[test]
    fn test_push_sets_index() {
        let mut log = MoveLog::new();
        log.push(&MoveRecord::start(PlayerId(0)));
        log.push(&MoveRecord::done(PlayerId(0)).with_index(99));

        let indices: Vec<_> = log.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_text_round_trip() {
        let p0 = PlayerId(0);
        let p1 = PlayerId(1);
        let log: MoveLog = vec![
            MoveRecord::start(p0),
            MoveRecord::movement(p0, Location::pool(p0, 0), Location::board('B', 2)),
            MoveRecord::done(p0),
            MoveRecord::pick(p1, Location::pool(p1, 0)),
            MoveRecord::drop(p1, Location::board('A', 1)),
            MoveRecord::done(p1),
        ]
        .into_iter()
        .collect();

        let text = log.to_text(&OpcodeTable::STANDARD);
        assert!(text.starts_with("P0 Start P0\nP0 Move P0 0 B 2\n"));

        let back = MoveLog::parse_text(&text, &OpcodeTable::STANDARD).unwrap();
        assert_eq!(back.len(), log.len());
        for (a, b) in back.iter().zip(log.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_parse_reports_line() {
        let text = "P0 Start P0\n\nP0 Frob A 1\n";
        match MoveLog::parse_text(text, &OpcodeTable::STANDARD) {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }

        match MoveLog::parse_text("Done", &OpcodeTable::STANDARD) {
            Err(ReplayError::BadLine { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected bad line, got {other:?}"),
        }
    }
}
