//! Textual move protocol.
//!
//! One move per line: `[seq] <Opcode> <args...>`, whitespace separated.
//!
//! - Board cells are two tokens, column letter then row: `C 4`.
//! - Pool slots are two tokens, owner then slot: `P1 0`.
//! - `Start` takes the player to move: `Start P0`.
//! - A custom operation the table does not name is written `#<code>`.
//! - Custom operations are positional; an empty position is written `-`.
//!
//! Parsing is purely syntactic. It never consults a board, so a move can be
//! fully specified without being legal.

use std::iter::Peekable;
use std::str::SplitWhitespace;

use crate::core::{Coord, Location, PlayerId};
use crate::error::MoveError;

use super::opcode::{ArgShape, MoveOp, OpcodeTable, MAX_TARGETS};
use super::record::MoveRecord;

struct Tokens<'a> {
    text: &'a str,
    inner: Peekable<SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            inner: text.split_whitespace().peekable(),
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str, MoveError> {
        self.inner
            .next()
            .ok_or_else(|| MoveError::malformed(self.text, format!("expected {what}")))
    }

    fn is_empty(&mut self) -> bool {
        self.inner.peek().is_none()
    }

    fn player(&mut self) -> Result<PlayerId, MoveError> {
        let tok = self.next("a player")?;
        PlayerId::from_token(tok)
            .ok_or_else(|| MoveError::malformed(self.text, format!("bad player {tok:?}")))
    }

    fn location(&mut self) -> Result<Location, MoveError> {
        let head = self.next("a location")?;
        if let Some(owner) = PlayerId::from_token(head) {
            let tok = self.next("a pool slot")?;
            let slot = tok
                .parse::<u8>()
                .map_err(|_| MoveError::malformed(self.text, format!("bad pool slot {tok:?}")))?;
            return Ok(Location::pool(owner, slot));
        }

        let mut chars = head.chars();
        let col = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => {
                return Err(MoveError::malformed(
                    self.text,
                    format!("bad location {head:?}"),
                ))
            }
        };
        let tok = self.next("a row")?;
        let row = tok
            .parse::<u8>()
            .ok()
            .filter(|&r| r >= 1)
            .ok_or_else(|| MoveError::malformed(self.text, format!("bad row {tok:?}")))?;
        Ok(Location::Board(Coord::new(col, row)))
    }

    /// A location, or `-` standing in for `Nowhere`.
    fn location_or_gap(&mut self) -> Result<Location, MoveError> {
        if self.inner.peek() == Some(&"-") {
            self.inner.next();
            return Ok(Location::Nowhere);
        }
        self.location()
    }

    fn board_cell(&mut self) -> Result<Location, MoveError> {
        match self.location()? {
            loc @ Location::Board(_) => Ok(loc),
            other => Err(MoveError::malformed(
                self.text,
                format!("expected a board cell, got {other}"),
            )),
        }
    }
}

fn parse_op(text: &str, tok: &str, table: &OpcodeTable) -> Result<MoveOp, MoveError> {
    if let Some(code) = tok.strip_prefix('#') {
        return code
            .parse::<i32>()
            .ok()
            .and_then(MoveOp::from_code)
            .ok_or_else(|| MoveError::malformed(text, format!("unknown opcode {tok:?}")));
    }
    table
        .lookup(tok)
        .ok_or_else(|| MoveError::malformed(text, format!("unknown operation {tok:?}")))
}

impl MoveRecord {
    /// Parse one protocol line for `player`.
    ///
    /// Unknown operations, missing or extra arguments are all
    /// `MalformedMove`; nothing is ever coerced to a no-op.
    pub fn parse(text: &str, player: PlayerId, table: &OpcodeTable) -> Result<Self, MoveError> {
        let mut tokens = Tokens::new(text);

        let mut head = tokens.next("an operation")?;
        let mut index = None;
        if head.bytes().all(|b| b.is_ascii_digit()) {
            let seq = head
                .parse::<u32>()
                .map_err(|_| MoveError::malformed(text, "sequence number out of range"))?;
            index = Some(seq);
            head = tokens.next("an operation")?;
        }

        let op = parse_op(text, head, table)?;
        let mut m = MoveRecord::new(op, player);
        m.index = index;

        match op.shape() {
            ArgShape::Nothing => {}
            ArgShape::Player => m.player = tokens.player()?,
            ArgShape::Location => {
                let loc = tokens.location()?;
                if op == MoveOp::Drop {
                    m.targets.push(loc);
                } else {
                    m.source = loc;
                }
            }
            ArgShape::BoardCell => {
                let loc = tokens.board_cell()?;
                if op == MoveOp::DropBoard {
                    m.targets.push(loc);
                } else {
                    m.source = loc;
                }
            }
            ArgShape::SourceAndTargets => {
                m.source = tokens.location()?;
                m.targets.push(tokens.location()?);
                while !tokens.is_empty() && m.targets.len() < MAX_TARGETS {
                    m.targets.push(tokens.location()?);
                }
            }
            ArgShape::Locations => {
                if !tokens.is_empty() {
                    m.source = tokens.location_or_gap()?;
                }
                while !tokens.is_empty() && m.targets.len() < MAX_TARGETS {
                    m.targets.push(tokens.location_or_gap()?);
                }
            }
        }

        if !tokens.is_empty() {
            return Err(MoveError::malformed(text, "trailing tokens"));
        }
        Ok(m)
    }

    /// Protocol line for this move. `parse` of the result gives back the
    /// same specified move.
    #[must_use]
    pub fn serialize(&self, table: &OpcodeTable) -> String {
        let mut out = String::new();
        if let Some(i) = self.index {
            out.push_str(&i.to_string());
            out.push(' ');
        }
        match table.name(self.op) {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("#{}", self.op.code())),
        }

        let args: Vec<Location> = match self.op.shape() {
            ArgShape::Nothing => Vec::new(),
            ArgShape::Player => {
                out.push(' ');
                out.push_str(&self.player.to_string());
                Vec::new()
            }
            ArgShape::Location | ArgShape::BoardCell if self.source.is_nowhere() => {
                vec![self.destination()]
            }
            ArgShape::Location | ArgShape::BoardCell => vec![self.source],
            ArgShape::SourceAndTargets => std::iter::once(self.source)
                .chain(self.targets.iter().copied())
                .collect(),
            ArgShape::Locations if self.source.is_nowhere() && self.targets.is_empty() => {
                Vec::new()
            }
            // positional, so gaps are written as `-`
            ArgShape::Locations => std::iter::once(self.source)
                .chain(self.targets.iter().copied())
                .collect(),
        };
        let gaps = self.op.shape() == ArgShape::Locations;
        for loc in args.into_iter().filter(|l| gaps || !l.is_nowhere()) {
            out.push(' ');
            out.push_str(&loc.to_string());
        }
        out
    }
}
