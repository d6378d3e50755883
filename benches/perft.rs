use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wrenchess::{Board, Zobrist};

const POSITIONS: [(&str, &str); 3] = [
    (
        "initial",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "sicilian",
        "r1b1kb1r/2p2ppp/p1p2n2/8/3qP3/5N2/PPP2PPP/RNBQR1K1 w kq - 0 9",
    ),
    (
        "middle",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
];

fn bench_movegen(c: &mut Criterion) {
    let keys = Arc::new(Zobrist::new());
    for (name, fen) in POSITIONS {
        let board = Board::from_fen(fen, keys.clone()).unwrap();
        c.bench_function(&format!("legal_moves_{}", name), |b| {
            b.iter(|| black_box(&board).legal_moves().len())
        });
    }
}

fn bench_perft(c: &mut Criterion) {
    let keys = Arc::new(Zobrist::new());
    for (name, fen) in POSITIONS {
        let mut board = Board::from_fen(fen, keys.clone()).unwrap();
        c.bench_function(&format!("perft_3_{}", name), |b| {
            b.iter(|| board.perft(black_box(3)))
        });
    }
}

criterion_group!(benches, bench_movegen, bench_perft);
criterion_main!(benches);
