//! Robot worker threads and robot seats in a session.

use std::time::Duration;

use boardcore::board::Board;
use boardcore::core::{Location, PlayerId};
use boardcore::error::SessionError;
use boardcore::games::tapatan::{Tapatan, TapatanBuilder};
use boardcore::moves::{MoveOp, MoveRecord};
use boardcore::robot::RobotWorker;
use boardcore::rules::Rules;
use boardcore::search::SearchConfig;
use boardcore::session::GameSession;

fn p(n: u8) -> PlayerId {
    PlayerId::new(n)
}

fn at(col: char, row: u8) -> Location {
    Location::board(col, row)
}

fn robot_config() -> SearchConfig {
    SearchConfig::default().with_max_depth(3)
}

#[test]
fn test_worker_answers_with_legal_move() {
    let mut board = Board::new(TapatanBuilder::new().build());
    board.start(p(0)).unwrap();
    let before = board.digest();

    let mut robot = RobotWorker::spawn(p(0), robot_config());
    robot.prepare_to_move(&board).unwrap();
    assert!(robot.is_thinking());

    let reply = robot.wait_reply().unwrap();
    assert!(!robot.is_thinking());
    assert!(!reply.is_fallback());
    assert_eq!(reply.player, p(0));
    assert_eq!(reply.position, before);
    assert!(board.rules().legal_moves(&board, p(0)).contains(&reply.mv));

    // the authoritative board was never touched
    assert_eq!(board.digest(), before);
    robot.stop();
}

#[test]
fn test_worker_serves_several_requests() {
    let mut board = Board::new(TapatanBuilder::new().build());
    board.start(p(0)).unwrap();
    let mut robot = RobotWorker::spawn(p(0), robot_config());

    for _ in 0..2 {
        robot.prepare_to_move(&board).unwrap();
        let reply = robot.wait_reply().unwrap();
        let mut mv = reply.mv;
        board.robot_execute(&mut mv).unwrap();

        // pretend the opponent passes its turn
        let mut null = MoveRecord::null(board.whose_turn());
        board.execute(&mut null).unwrap();
    }
    assert_eq!(board.pool(p(0))[0].height(), 1);
}

#[test]
fn test_try_reply_polls() {
    let mut board = Board::new(TapatanBuilder::new().build());
    board.start(p(0)).unwrap();
    let mut robot = RobotWorker::spawn(p(0), robot_config());
    robot.prepare_to_move(&board).unwrap();

    let mut reply = None;
    for _ in 0..500 {
        if let Some(r) = robot.try_reply().unwrap() {
            reply = Some(r);
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(reply.is_some());
}

#[test]
fn test_cancel_returns_early() {
    let rules = TapatanBuilder::new()
        .columns(5)
        .rows(5)
        .chips_per_player(8)
        .line_length(4)
        .build();
    let mut board = Board::new(rules);
    board.start(p(0)).unwrap();

    let config = SearchConfig::default()
        .with_max_depth(10)
        .with_verify_digests(false);
    let mut robot = RobotWorker::spawn(p(0), config);
    robot.prepare_to_move(&board).unwrap();
    std::thread::sleep(Duration::from_millis(20));
    robot.cancel();

    let reply = robot.wait_reply().unwrap();
    assert!(reply.stats.aborted);
    assert!(!reply.is_fallback());
    assert_eq!(reply.mv.op, MoveOp::Move);
}

#[test]
fn test_robots_play_a_full_game() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.attach_robot(p(0), robot_config().with_seed(1));
    session.attach_robot(p(1), robot_config().with_seed(2));
    session.apply_local(MoveRecord::start(p(0))).unwrap();

    let mut turns = 0;
    while !session.board().is_game_over() && turns < 60 {
        let seat = session.board().whose_turn();
        session.request_robot_move(seat).unwrap();
        let reply = session.play_robot_move(seat).unwrap();
        assert_eq!(reply.player, seat);
        turns += 1;
    }

    // every robot turn is the move plus its confirmation
    let text = session.to_log_text();
    let replayed = {
        let log = boardcore::moves::MoveLog::parse_text(&text, session.opcodes()).unwrap();
        let mut board = Board::new(TapatanBuilder::new().build());
        log.replay(&mut board).unwrap();
        board
    };
    assert_eq!(replayed.digest(), session.board().digest());
    assert_eq!(replayed.outcome(), session.board().outcome());
}

#[test]
fn test_stale_reply_is_refused() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.attach_robot(p(0), robot_config());
    session.apply_local(MoveRecord::start(p(0))).unwrap();

    session.request_robot_move(p(0)).unwrap();
    // the human at seat 0 moves first
    session
        .apply_local(MoveRecord::movement(p(0), Tapatan::reserve(p(0)), at('B', 2)))
        .unwrap();
    session.apply_local(MoveRecord::done(p(0))).unwrap();
    let before = session.board().digest();

    assert!(matches!(
        session.play_robot_move(p(0)),
        Err(SessionError::StaleReply(seat)) if seat == p(0)
    ));
    assert_eq!(session.board().digest(), before);
    assert_eq!(session.history().len(), 3);
}

#[test]
fn test_missing_robot() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    assert!(matches!(
        session.request_robot_move(p(1)),
        Err(SessionError::NoRobot(_))
    ));

    session.attach_robot(p(1), robot_config());
    assert!(session.has_robot(p(1)));
    session.detach_robot(p(1));
    assert!(!session.has_robot(p(1)));
}

#[test]
fn test_failed_search_falls_back() {
    // a finished game cannot be searched; the robot resigns instead
    let mut board = Board::new(TapatanBuilder::new().build());
    board.start(p(0)).unwrap();
    for (pl, col, row) in [(0, 'A', 1), (1, 'A', 2), (0, 'B', 1), (1, 'B', 2), (0, 'C', 1)] {
        let mut m = MoveRecord::movement(p(pl), Tapatan::reserve(p(pl)), at(col, row));
        board.robot_execute(&mut m).unwrap();
    }
    assert!(board.is_game_over());

    let mut robot = RobotWorker::spawn(p(1), robot_config());
    robot.prepare_to_move(&board).unwrap();
    let reply = robot.wait_reply().unwrap();
    assert!(reply.is_fallback());
    assert_eq!(reply.mv, MoveRecord::resign(p(1)));
    assert!(reply.score.is_none());
}
