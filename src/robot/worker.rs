//! Dedicated search thread for one robot seat.
//!
//! The authoritative board never crosses the thread boundary. The owner
//! hands over a deep clone (`prepare_to_move`) and later receives exactly
//! one `RobotReply` for it. Both handoffs move ownership through a channel;
//! the only shared state is the cancel flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::board::Board;
use crate::core::{GameRng, PlayerId};
use crate::error::{SearchError, SessionError};
use crate::moves::MoveRecord;
use crate::rules::Rules;
use crate::search::{SearchConfig, SearchDriver, SearchStats};

/// Answer to one `prepare_to_move`.
#[derive(Clone, Debug)]
pub struct RobotReply {
    pub player: PlayerId,
    /// Move to play. The rules' fallback move if the search failed.
    pub mv: MoveRecord,
    pub score: Option<f64>,
    /// Digest of the position that was searched.
    pub position: u64,
    pub stats: SearchStats,
    /// Why the search failed, if it did.
    pub error: Option<SearchError>,
}

impl RobotReply {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Handle to a robot thread.
pub struct RobotWorker<R: Rules> {
    player: PlayerId,
    requests: Option<Sender<Board<R>>>,
    replies: Receiver<RobotReply>,
    cancel: Arc<AtomicBool>,
    pending: bool,
    handle: Option<JoinHandle<()>>,
}

impl<R: Rules> RobotWorker<R> {
    /// Start the thread. Each seat gets its own random stream derived from
    /// the config seed.
    pub fn spawn(player: PlayerId, config: SearchConfig) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<Board<R>>();
        let (reply_tx, reply_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::spawn(move || run(player, config, flag, request_rx, reply_tx));
        debug!(%player, "robot worker started");

        Self {
            player,
            requests: Some(request_tx),
            replies: reply_rx,
            cancel,
            pending: false,
            handle: Some(handle),
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// True between `prepare_to_move` and the matching reply.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        self.pending
    }

    /// Hand a clone of `board` to the thread and start searching.
    pub fn prepare_to_move(&mut self, board: &Board<R>) -> Result<(), SessionError> {
        let unavailable = SessionError::RobotUnavailable(self.player);
        let requests = self.requests.as_ref().ok_or(unavailable.clone())?;
        self.cancel.store(false, Ordering::Relaxed);
        requests
            .send(board.clone_board())
            .map_err(|_| unavailable)?;
        self.pending = true;
        Ok(())
    }

    /// Reply if one is ready.
    pub fn try_reply(&mut self) -> Result<Option<RobotReply>, SessionError> {
        match self.replies.try_recv() {
            Ok(reply) => {
                self.pending = false;
                Ok(Some(reply))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SessionError::RobotUnavailable(self.player)),
        }
    }

    /// Block until the reply arrives.
    pub fn wait_reply(&mut self) -> Result<RobotReply, SessionError> {
        let reply = self
            .replies
            .recv()
            .map_err(|_| SessionError::RobotUnavailable(self.player))?;
        self.pending = false;
        Ok(reply)
    }

    /// Ask the running search to finish early. It still replies.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Cancel, close the request channel and join the thread.
    pub fn stop(&mut self) {
        self.cancel();
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!(player = %self.player, "robot worker panicked");
            }
        }
    }
}

impl<R: Rules> Drop for RobotWorker<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<R: Rules>(
    player: PlayerId,
    config: SearchConfig,
    cancel: Arc<AtomicBool>,
    requests: Receiver<Board<R>>,
    replies: Sender<RobotReply>,
) {
    let seat_rng = GameRng::new(config.seed).fork(player.0 as u64 + 1);
    let mut driver = SearchDriver::new(config)
        .with_cancel(cancel)
        .with_rng(seat_rng);

    while let Ok(mut board) = requests.recv() {
        let position = board.digest();
        let reply = match driver.find_static_best_move(&mut board) {
            Ok(result) => RobotReply {
                player,
                mv: result.best,
                score: Some(result.score),
                position,
                stats: result.stats,
                error: None,
            },
            Err(err) => {
                error!(%player, %err, "robot search failed, playing fallback move");
                RobotReply {
                    player,
                    mv: board.rules().fallback_move(&board, player),
                    score: None,
                    position,
                    stats: driver.stats().clone(),
                    error: Some(err),
                }
            }
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
    debug!(%player, "robot worker stopped");
}
