//! A live game: the authoritative board, its history, and robot seats.
//!
//! Errors are handled at the boundary nearest their origin:
//!
//! - A refused local action leaves the board untouched and is returned as
//!   `Rejected` / `Exec` for the UI to show or ignore.
//! - A remote line that does not parse or apply is logged and marks the
//!   session desynchronised; from then on remote input is refused.
//! - A robot whose search failed still answers, with the rules' fallback
//!   move.

use tracing::{debug, warn};

use crate::board::Board;
use crate::core::{PlayerId, PlayerMap};
use crate::error::{ExecError, SessionError};
use crate::moves::{MoveLog, MoveRecord, OpcodeTable};
use crate::robot::{RobotReply, RobotWorker};
use crate::rules::Rules;
use crate::search::SearchConfig;

pub struct GameSession<R: Rules> {
    board: Board<R>,
    history: MoveLog,
    table: OpcodeTable,
    robots: PlayerMap<Option<RobotWorker<R>>>,
    desync: Option<String>,
}

impl<R: Rules> GameSession<R> {
    pub fn new(rules: R) -> Self {
        let table = rules.opcodes();
        let board = Board::new(rules);
        let robots = PlayerMap::new(board.player_count(), |_| None);
        Self {
            board,
            history: MoveLog::new(),
            table,
            robots,
            desync: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board<R> {
        &self.board
    }

    #[must_use]
    pub fn history(&self) -> &MoveLog {
        &self.history
    }

    #[must_use]
    pub fn opcodes(&self) -> &OpcodeTable {
        &self.table
    }

    #[must_use]
    pub fn is_desynchronized(&self) -> bool {
        self.desync.is_some()
    }

    /// Game record as text.
    #[must_use]
    pub fn to_log_text(&self) -> String {
        self.history.to_text(&self.table)
    }

    /// Apply a move made through the local UI.
    pub fn apply_local(&mut self, mut m: MoveRecord) -> Result<(), SessionError> {
        match self.board.execute(&mut m) {
            Ok(()) => {
                self.history.push(&m);
                Ok(())
            }
            Err(ExecError::Transition(t)) => {
                debug!(mv = %m, reason = %t, "local action rejected");
                Err(SessionError::Rejected(t))
            }
            Err(e) => {
                debug!(mv = %m, reason = %e, "local move refused");
                Err(SessionError::Exec(e))
            }
        }
    }

    /// Apply one protocol line received from `player`'s peer.
    pub fn apply_remote(&mut self, line: &str, player: PlayerId) -> Result<(), SessionError> {
        if let Some(why) = &self.desync {
            return Err(SessionError::Desynchronized(why.clone()));
        }

        let mut m = match MoveRecord::parse(line, player, &self.table) {
            Ok(m) => m,
            Err(e) => return Err(self.desynchronize(e.to_string())),
        };
        if let Err(e) = self.board.execute(&mut m) {
            return Err(self.desynchronize(format!("{player} sent {line:?}: {e}")));
        }
        self.history.push(&m);
        Ok(())
    }

    fn desynchronize(&mut self, why: String) -> SessionError {
        warn!(reason = %why, "remote move failed, session desynchronized");
        self.desync = Some(why.clone());
        SessionError::Desynchronized(why)
    }

    /// Take back the last move in the history. Returns it, or `None` if
    /// the history is empty.
    pub fn undo_last(&mut self) -> Result<Option<MoveRecord>, SessionError> {
        let Some(last) = self.history.pop() else {
            return Ok(None);
        };
        let mut replay = Board::new(self.board.rules().clone());
        if let Err(e) = self.history.replay(&mut replay) {
            self.history.push(&last);
            return Err(SessionError::Desynchronized(e.to_string()));
        }
        self.board = replay;
        Ok(Some(last))
    }

    // === Robots ===

    /// Put a robot in `player`'s seat, replacing any robot already there.
    pub fn attach_robot(&mut self, player: PlayerId, config: SearchConfig) {
        self.robots[player] = Some(RobotWorker::spawn(player, config));
    }

    pub fn detach_robot(&mut self, player: PlayerId) {
        if let Some(mut robot) = self.robots[player].take() {
            robot.stop();
        }
    }

    #[must_use]
    pub fn has_robot(&self, player: PlayerId) -> bool {
        self.robots[player].is_some()
    }

    /// Start the robot in `player`'s seat thinking about the current
    /// position.
    pub fn request_robot_move(&mut self, player: PlayerId) -> Result<(), SessionError> {
        let robot = self.robots[player]
            .as_mut()
            .ok_or(SessionError::NoRobot(player))?;
        robot.prepare_to_move(&self.board)
    }

    /// Wait for the robot's answer and play it.
    pub fn play_robot_move(&mut self, player: PlayerId) -> Result<RobotReply, SessionError> {
        let robot = self.robots[player]
            .as_mut()
            .ok_or(SessionError::NoRobot(player))?;
        let reply = robot.wait_reply()?;
        self.apply_robot_reply(&reply)?;
        Ok(reply)
    }

    /// Play a robot's answer through the same execute path as any other
    /// move. A reply for a position that has since changed is refused.
    pub fn apply_robot_reply(&mut self, reply: &RobotReply) -> Result<(), SessionError> {
        if reply.position != self.board.digest() {
            warn!(player = %reply.player, "discarding robot reply for an old position");
            return Err(SessionError::StaleReply(reply.player));
        }

        let mut m = reply.mv.clone();
        self.board.robot_execute(&mut m)?;
        self.history.push(&m);
        if m.undo_info().is_some_and(|u| u.auto_done()) {
            self.history.push(&MoveRecord::done(reply.player));
        }
        Ok(())
    }
}
