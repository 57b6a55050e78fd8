//! Criterion benchmarks for the full coupled step.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ibis_bench::{laminar_solvers, reference_profile, turbulent_solvers};
use ibis_engine::Sequencer;
use ibis_exchange::SingleProcess;

fn bench_step_laminar(c: &mut Criterion) {
    let mut sequencer = Sequencer::new(
        reference_profile(),
        laminar_solvers(),
        Box::new(SingleProcess::new()),
        None,
    )
    .unwrap();

    // Warm up: first step seeds history and settles the timestep.
    sequencer.step().unwrap();

    c.bench_function("step_laminar_128x128", |b| {
        b.iter(|| {
            let metrics = sequencer.step().unwrap();
            black_box(&metrics);
        });
    });
}

fn bench_step_turbulent(c: &mut Criterion) {
    let mut sequencer = Sequencer::new(
        reference_profile(),
        turbulent_solvers(),
        Box::new(SingleProcess::new()),
        None,
    )
    .unwrap();

    sequencer.step().unwrap();

    c.bench_function("step_turbulent_128x128", |b| {
        b.iter(|| {
            let metrics = sequencer.step().unwrap();
            black_box(&metrics);
        });
    });
}

criterion_group!(benches, bench_step_laminar, bench_step_turbulent);
criterion_main!(benches);
