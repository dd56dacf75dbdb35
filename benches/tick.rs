use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec2;

use grapple_core::{InputFrame, LevelDescription, LevelGeometry, LineKind, PhysicsConfig, Simulation};

fn walking_input(t: u32) -> InputFrame {
    let frame = InputFrame::with_movement(1.0);
    if t % 40 == 0 {
        frame.jumping()
    } else {
        frame
    }
}

fn bench_step(c: &mut Criterion) {
    let description = LevelDescription::demo();
    let level = LevelGeometry::from_description(&description);

    c.bench_function("step_walking_60", |b| {
        b.iter_batched(
            || Simulation::for_level(&description, PhysicsConfig::default()),
            |mut sim| {
                for t in 0..60 {
                    black_box(sim.step(&walking_input(t), &level));
                }
                sim
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("step_rope_swing_60", |b| {
        b.iter_batched(
            || {
                let mut sim = Simulation::for_level(&description, PhysicsConfig::default());
                sim.step(&InputFrame::new().firing(Vec2::new(6.0, 9.0), LineKind::Rope), &level);
                sim
            },
            |mut sim| {
                for _ in 0..60 {
                    black_box(sim.step(&InputFrame::with_movement(1.0), &level));
                }
                sim
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_state_hash(c: &mut Criterion) {
    let description = LevelDescription::demo();
    let sim = Simulation::for_level(&description, PhysicsConfig::default());
    c.bench_function("state_hash", |b| b.iter(|| black_box(sim.state_hash())));
}

criterion_group!(benches, bench_step, bench_state_hash);
criterion_main!(benches);
