//! Criterion benchmarks for the cell-to-surface force transfer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ibis_core::FlowField;
use ibis_coupling::{ForceTransferEngine, GeometryUpdater, WallGradientShear};
use ibis_exchange::SingleProcess;
use ibis_mesh::{BackgroundMesh, ParallelPartition, SolidMesh};

fn transfer_case(nx: usize, segments: usize) -> (FlowField, BackgroundMesh, SolidMesh, ParallelPartition) {
    let mut mesh = BackgroundMesh::new(nx, nx, 1.0 / nx as f64, 1.0 / nx as f64, [0.0, 0.0])
        .unwrap();
    let solid = SolidMesh::circle([0.5, 0.5], 0.2, segments).unwrap();
    GeometryUpdater::new().update(&mut mesh, &solid);
    let mut flow = FlowField::zeros(mesh.cell_count());
    for cell in 0..mesh.cell_count() {
        flow.u.current_mut()[cell] = [1.0, 0.1];
        flow.p.current_mut()[cell] = 0.5;
    }
    let partition = ParallelPartition::new(&mesh, 1).unwrap();
    (flow, mesh, solid, partition)
}

fn bench_transfer_128(c: &mut Criterion) {
    let (flow, mesh, solid, partition) = transfer_case(128, 64);
    let engine = ForceTransferEngine::new(3.0, 1e-3, Box::new(WallGradientShear));
    let comm = SingleProcess::new();

    c.bench_function("force_transfer_128x128_64pts", |b| {
        b.iter(|| {
            let load = engine
                .compute_surface_load(&flow, &mesh, &solid, &partition, &comm)
                .unwrap();
            black_box(&load);
        });
    });
}

fn bench_transfer_256(c: &mut Criterion) {
    let (flow, mesh, solid, partition) = transfer_case(256, 128);
    let engine = ForceTransferEngine::new(3.0, 1e-3, Box::new(WallGradientShear));
    let comm = SingleProcess::new();

    c.bench_function("force_transfer_256x256_128pts", |b| {
        b.iter(|| {
            let load = engine
                .compute_surface_load(&flow, &mesh, &solid, &partition, &comm)
                .unwrap();
            black_box(&load);
        });
    });
}

fn bench_geometry_update_128(c: &mut Criterion) {
    let (_, mut mesh, solid, _) = transfer_case(128, 64);
    let updater = GeometryUpdater::new();

    c.bench_function("geometry_update_128x128", |b| {
        b.iter(|| {
            updater.update(&mut mesh, &solid);
            black_box(mesh.classes());
        });
    });
}

criterion_group!(
    benches,
    bench_transfer_128,
    bench_transfer_256,
    bench_geometry_update_128
);
criterion_main!(benches);
