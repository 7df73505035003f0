use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gridspin::core::{Board, ChainResolver, ColorPicker, MatchDetector, PaletteSource};
use gridspin::engine::BoardEngine;
use gridspin::types::{BoardConfig, Direction, Position};

fn full_board(width: u8, height: u8, palette: u8, seed: u32) -> Board {
    let mut board = Board::new(width, height);
    let mut colors = PaletteSource::new(seed, palette);
    let positions: Vec<Position> = board.positions().collect();
    for pos in positions {
        let color = colors.next_color();
        let _ = board.set(pos, Some(color));
    }
    board
}

fn bench_detection(c: &mut Criterion) {
    let detector = MatchDetector::new(3);
    let board = full_board(12, 12, 5, 12345);

    c.bench_function("detect_12x12", |b| {
        b.iter(|| detector.find_matches(black_box(&board)))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = ChainResolver::new(3);
    // A 4-color 12x12 fill reliably contains starting matches to chain on.
    let board = full_board(12, 12, 4, 99);

    c.bench_function("resolve_12x12", |b| {
        b.iter(|| {
            let mut working = board.clone();
            let mut colors = PaletteSource::new(7, 4);
            let mut steps = Vec::new();
            resolver.resolve(&mut working, &mut colors, &mut steps);
            steps
        })
    });
}

fn bench_rotate_command(c: &mut Criterion) {
    let config = BoardConfig {
        width: 12,
        height: 12,
        ..BoardConfig::default()
    };
    let mut engine = BoardEngine::new(config, 12345).expect("valid config");

    c.bench_function("rotate_command", |b| {
        b.iter(|| {
            let steps = engine.rotate(black_box(Direction::Right)).expect("not busy");
            engine.command_completed();
            steps
        })
    });
}

fn bench_tap_command(c: &mut Criterion) {
    let mut engine = BoardEngine::new(BoardConfig::default(), 12345).expect("valid config");

    c.bench_function("tap_command", |b| {
        b.iter(|| {
            let steps = engine.tap(black_box(Position::new(3, 1))).expect("not busy");
            engine.command_completed();
            steps
        })
    });
}

criterion_group!(
    benches,
    bench_detection,
    bench_resolve,
    bench_rotate_command,
    bench_tap_command
);
criterion_main!(benches);
