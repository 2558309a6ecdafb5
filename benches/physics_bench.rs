use animbake::{BodySeed, JointKind, JointSpec, SimSettings, Simulation};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use std::hint::black_box;

fn prepare_sim(body_count: usize) -> Simulation {
    let mut settings = SimSettings::default();
    settings.duration = 1.0;
    settings.floor_y = 2000.0;
    let mut sim = Simulation::new(settings).expect("valid settings");

    for i in 0..body_count {
        let seed = BodySeed {
            position: Vec2::new((i % 16) as f32 * 120.0, (i / 16) as f32 * 120.0),
            ..BodySeed::default()
        };
        sim.add_body(seed.build(sim.settings()));
    }
    sim
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_run");
    for &count in &[16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::new("bodies", count), &count, |b, &count| {
            b.iter(|| {
                let mut sim = prepare_sim(count);
                sim.run().expect("run succeeds");
                black_box(sim.trajectories().len())
            })
        });
    }
    group.finish();
}

fn bench_jointed_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("jointed_chain");
    for &count in &[8usize, 32] {
        group.bench_with_input(BenchmarkId::new("links", count), &count, |b, &count| {
            b.iter(|| {
                let mut sim = prepare_sim(count);
                for i in 0..count - 1 {
                    sim.add_joint(&JointSpec::new(i, i + 1, JointKind::Distance))
                        .expect("valid joint");
                }
                sim.run().expect("run succeeds");
                black_box(sim.trajectories().len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run, bench_jointed_chain);
criterion_main!(benches);
