use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minebot_core::*;
use std::hint::black_box;

/// Board halfway through a game, taken from a seeded simulated session.
fn midgame_board(config: MinefieldConfig, seed: u64, moves: usize) -> BoardModel {
    let game = SimulatedGame::random(config, seed);
    let session_config = SessionConfig::new(config.size).unwrap();
    let mut session = DecisionLoop::new(
        session_config,
        DeductionEngine::seeded(seed),
        game.clone(),
        game.clone(),
    );
    for _ in 0..moves {
        if session.step().unwrap().state.is_terminal() {
            break;
        }
    }
    session.board().clone()
}

fn bench_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide");
    let tiers = [
        ("beginner", MinefieldConfig::beginner()),
        ("intermediate", MinefieldConfig::intermediate()),
        ("expert", MinefieldConfig::expert()),
    ];

    for (name, config) in tiers {
        let board = midgame_board(config, 7, 40);
        group.bench_with_input(BenchmarkId::from_parameter(name), &board, |b, board| {
            let mut engine = DeductionEngine::seeded(7);
            b.iter(|| engine.decide(black_box(board)))
        });
    }

    group.finish();
}

fn bench_full_session(c: &mut Criterion) {
    c.bench_function("session/beginner", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let game = SimulatedGame::random(MinefieldConfig::beginner(), seed);
            let config = SessionConfig::new(game.size()).unwrap();
            let mut session =
                DecisionLoop::new(config, DeductionEngine::seeded(seed), game.clone(), game);
            black_box(session.run().unwrap())
        })
    });
}

criterion_group!(benches, bench_decide, bench_full_session);
criterion_main!(benches);
