//! Search and board benchmarks.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - Full alpha-beta search at increasing depth
//! - Two-player alpha-beta against three-player maxn
//! - The execute / un_execute round trip every search node pays
//! - Position digests and board clones

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use boardcore::board::Board;
use boardcore::core::{Location, PlayerId};
use boardcore::games::tapatan::{Tapatan, TapatanBuilder};
use boardcore::moves::MoveRecord;
use boardcore::rules::Rules;
use boardcore::search::{SearchConfig, SearchDriver};

fn opening(rules: Tapatan) -> Board<Tapatan> {
    let mut board = Board::new(rules);
    board.start(PlayerId::new(0)).unwrap();
    board
}

fn midgame() -> Board<Tapatan> {
    let mut board = opening(TapatanBuilder::new().build());
    for (pl, col, row) in [(0u8, 'A', 1), (1, 'B', 2), (0, 'C', 3), (1, 'A', 3)] {
        let player = PlayerId::new(pl);
        let mut m = MoveRecord::movement(player, Tapatan::reserve(player), Location::board(col, row));
        board.robot_execute(&mut m).unwrap();
    }
    board
}

fn bench_config(depth: u32) -> SearchConfig {
    SearchConfig::default()
        .with_max_depth(depth)
        .with_verify_digests(false)
}

// =============================================================================
// Full search
// =============================================================================

fn bench_search_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_depth");

    for depth in [2u32, 3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("tapatan_opening", depth), &depth, |b, &depth| {
            let mut board = opening(TapatanBuilder::new().build());
            let mut driver = SearchDriver::new(bench_config(depth));
            b.iter(|| black_box(driver.find_static_best_move(&mut board).unwrap()));
        });
    }

    group.finish();
}

fn bench_search_players(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_players");

    for players in [2usize, 3, 4] {
        group.bench_with_input(BenchmarkId::new("tapatan_4x4", players), &players, |b, &players| {
            let rules = TapatanBuilder::new()
                .columns(4)
                .rows(4)
                .player_count(players)
                .build();
            let mut board = opening(rules);
            let mut driver = SearchDriver::new(bench_config(3));
            b.iter(|| black_box(driver.find_static_best_move(&mut board).unwrap()));
        });
    }

    group.finish();
}

fn bench_pruning(c: &mut Criterion) {
    let mut group = c.benchmark_group("pruning");

    let variants = [
        ("minimax", bench_config(4).with_alpha_beta(false).with_killer(false)),
        ("alpha_beta", bench_config(4).with_killer(false)),
        ("alpha_beta_killers", bench_config(4)),
    ];
    for (name, config) in variants {
        group.bench_function(name, |b| {
            let mut board = midgame();
            let mut driver = SearchDriver::new(config.clone());
            b.iter(|| black_box(driver.find_static_best_move(&mut board).unwrap()));
        });
    }

    group.finish();
}

// =============================================================================
// Board primitives
// =============================================================================

fn bench_execute_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("board");
    let mut board = midgame();
    let mover = board.whose_turn();
    let moves = board.rules().legal_moves(&board, mover);

    group.throughput(Throughput::Elements(moves.len() as u64));
    group.bench_function("execute_un_execute", |b| {
        b.iter(|| {
            for m in &moves {
                let mut m = m.clone();
                board.robot_execute(&mut m).unwrap();
                board.un_execute(&mut m).unwrap();
            }
        });
    });

    group.bench_function("digest", |b| {
        b.iter(|| black_box(board.digest()));
    });

    group.bench_function("clone_board", |b| {
        b.iter(|| black_box(board.clone_board()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_search_depth,
    bench_search_players,
    bench_pruning,
    bench_execute_round_trip
);
criterion_main!(benches);
