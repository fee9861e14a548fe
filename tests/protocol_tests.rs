//! Move text, game logs and the session's remote boundary.

use boardcore::board::{Board, BoardState};
use boardcore::core::{Location, PlayerId};
use boardcore::error::{ReplayError, SessionError};
use boardcore::games::tapatan::{Tapatan, TapatanBuilder, JUMP};
use boardcore::moves::{MoveLog, MoveOp, MoveRecord};
use boardcore::rules::{GameOutcome, Rules};
use boardcore::session::GameSession;

fn p(n: u8) -> PlayerId {
    PlayerId::new(n)
}

fn at(col: char, row: u8) -> Location {
    Location::board(col, row)
}

const OPENING: &str = "\
P0 Start P0
P0 Move P0 0 A 1
P0 Done
P1 Move P1 0 B 2
P1 Done
P0 Move P0 0 B 1
P0 Done
";

#[test]
fn test_parse_game_moves() {
    let table = TapatanBuilder::new().build().opcodes();

    let m = MoveRecord::parse("Move P0 0 B 2", p(0), &table).unwrap();
    assert_eq!(m.op, MoveOp::Move);
    assert_eq!(m.source, Tapatan::reserve(p(0)));
    assert_eq!(m.destination(), at('B', 2));

    let m = MoveRecord::parse("7 jump a 1 c 3", p(1), &table).unwrap();
    assert_eq!(m.op, MoveOp::Custom(JUMP));
    assert_eq!(m.index, Some(7));
    assert_eq!(m.serialize(&table), "7 Jump A 1 C 3");

    for bad in ["", "Move", "Move P0", "Fly A 1", "Move P0 0 B", "Done now", "Pick Z"] {
        assert!(MoveRecord::parse(bad, p(0), &table).is_err(), "{bad:?} parsed");
    }
}

#[test]
fn test_same_specified_move_ignores_bookkeeping() {
    let mut b = Board::new(TapatanBuilder::new().build());
    b.start(p(0)).unwrap();

    let listed = MoveRecord::movement(p(0), Tapatan::reserve(p(0)), at('A', 1));
    let mut played = listed.clone().with_index(12);
    b.robot_execute(&mut played).unwrap();

    assert!(played.same_specified_move(&listed));
    assert_eq!(played, listed);
    assert!(!played.same_specified_move(&MoveRecord::movement(
        p(0),
        Tapatan::reserve(p(0)),
        at('A', 2)
    )));
}

#[test]
fn test_log_replays_into_same_position() {
    let rules = TapatanBuilder::new().build();
    let table = rules.opcodes();
    let log = MoveLog::parse_text(OPENING, &table).unwrap();
    assert_eq!(log.len(), 7);

    let mut replayed = Board::new(rules.clone());
    log.replay(&mut replayed).unwrap();

    let mut direct = Board::new(rules);
    direct.start(p(0)).unwrap();
    for (pl, to) in [(0, at('A', 1)), (1, at('B', 2)), (0, at('B', 1))] {
        let mut m = MoveRecord::movement(p(pl), Tapatan::reserve(p(pl)), to);
        direct.robot_execute(&mut m).unwrap();
    }
    assert_eq!(replayed.digest(), direct.digest());
    assert!(replayed.same_board(&direct).is_ok());

    assert_eq!(log.to_text(&table), OPENING);
}

#[test]
fn test_replay_reports_failing_line() {
    let rules = TapatanBuilder::new().build();
    let text = "P0 Start P0\nP1 Move P1 0 A 1\n";
    let log = MoveLog::parse_text(text, &rules.opcodes()).unwrap();

    let mut board = Board::new(rules);
    match log.replay(&mut board) {
        Err(ReplayError::Apply { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected apply error, got {other:?}"),
    }
}

#[test]
fn test_session_mirrors_remote_game() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.apply_local(MoveRecord::start(p(0))).unwrap();
    session.apply_remote("Move P0 0 A 1", p(0)).unwrap();
    session.apply_remote("Done", p(0)).unwrap();

    assert_eq!(session.board().whose_turn(), p(1));
    assert_eq!(session.history().len(), 3);
    assert!(!session.is_desynchronized());
    assert_eq!(
        session.to_log_text(),
        "P0 Start P0\nP0 Move P0 0 A 1\nP0 Done\n"
    );
}

#[test]
fn test_bad_remote_move_desynchronizes() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.apply_local(MoveRecord::start(p(0))).unwrap();
    let before = session.board().digest();

    let r = session.apply_remote("Move P1 0 A 1", p(1));
    assert!(matches!(r, Err(SessionError::Desynchronized(_))));
    assert!(session.is_desynchronized());
    assert_eq!(session.board().digest(), before);

    // everything after that is refused, even good moves
    let r = session.apply_remote("Move P0 0 A 1", p(0));
    assert!(matches!(r, Err(SessionError::Desynchronized(_))));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_garbled_remote_line_desynchronizes() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    let r = session.apply_remote("Teleport A 1", p(0));
    assert!(matches!(r, Err(SessionError::Desynchronized(_))));
    assert!(session.is_desynchronized());
}

#[test]
fn test_local_rejection_leaves_board() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.apply_local(MoveRecord::start(p(0))).unwrap();
    let before = session.board().digest();

    let r = session.apply_local(MoveRecord::done(p(0)));
    assert!(matches!(r, Err(SessionError::Rejected(_))));
    let r = session.apply_local(MoveRecord::movement(p(1), Tapatan::reserve(p(1)), at('A', 1)));
    assert!(matches!(r, Err(SessionError::Exec(_))));

    assert_eq!(session.board().digest(), before);
    assert!(!session.is_desynchronized());
}

#[test]
fn test_undo_last_replays_history() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.apply_local(MoveRecord::start(p(0))).unwrap();
    session
        .apply_local(MoveRecord::movement(p(0), Tapatan::reserve(p(0)), at('A', 1)))
        .unwrap();
    let staged = session.board().digest();
    session.apply_local(MoveRecord::done(p(0))).unwrap();

    let undone = session.undo_last().unwrap();
    assert_eq!(undone.map(|m| m.op), Some(MoveOp::Done));
    assert_eq!(session.board().state(), BoardState::Confirm);
    assert_eq!(session.board().digest(), staged);
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_full_game_to_win() {
    let mut session = GameSession::new(TapatanBuilder::new().build());
    session.apply_local(MoveRecord::start(p(0))).unwrap();
    for (pl, col, row) in [(0, 'A', 1), (1, 'A', 2), (0, 'B', 1), (1, 'B', 2), (0, 'C', 1)] {
        let line = format!("Move P{pl} 0 {col} {row}");
        session.apply_remote(&line, p(pl)).unwrap();
        session.apply_remote("Done", p(pl)).unwrap();
    }
    assert_eq!(session.board().outcome(), Some(GameOutcome::Winner(p(0))));

    let text = session.to_log_text();
    let log = MoveLog::parse_text(&text, session.opcodes()).unwrap();
    let mut board = Board::new(TapatanBuilder::new().build());
    log.replay(&mut board).unwrap();
    assert!(board.is_game_over());
}
