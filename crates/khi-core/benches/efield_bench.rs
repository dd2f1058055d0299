use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use khi_core::efield::create_efield;
use khi_core::geomag::{project, GeomagGrid};
use khi_types::config::{BoundaryStrategy, KhiConfig, SimConfig};
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use std::hint::black_box;
use std::path::PathBuf;

fn bench_config() -> SimConfig {
    SimConfig {
        indat_file: PathBuf::from("inputs/initial_conditions.npz"),
        time: vec![Utc.with_ymd_and_hms(2013, 2, 20, 5, 0, 0).unwrap()],
        tdur: 300.0,
        dt_e0: 60.0,
        dtprec: None,
        e0_dir: PathBuf::from("inputs/fields"),
        precdir: None,
        exit: None,
        eyit: None,
        precip: None,
        khi: KhiConfig::default(),
        seed: None,
    }
}

fn bench_projection(c: &mut Criterion) {
    let grid = SimGrid::cartesian([32, 256, 192], (80e3, 900e3), 200e3, 100e3, 67.0, 212.0)
        .expect("bench grid");
    let geomag = GeomagGrid::covering(&grid);
    c.bench_function("project_512x512", |b| {
        b.iter(|| black_box(project(&grid, &geomag).expect("projection")))
    });
}

fn bench_create_efield(c: &mut Criterion) {
    let grid = SimGrid::cartesian([32, 256, 192], (80e3, 900e3), 200e3, 100e3, 67.0, 212.0)
        .expect("bench grid");
    let cfg = bench_config();
    let params = PerturbParams::default();

    let mut group = c.benchmark_group("create_efield_6x512x512");
    group.sample_size(10);
    for strategy in [
        BoundaryStrategy::BackgroundField,
        BoundaryStrategy::PotentialIntegration,
    ] {
        group.bench_function(format!("{strategy:?}"), |b| {
            b.iter(|| black_box(create_efield(&cfg, &grid, &params, strategy).expect("efield")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection, bench_create_efield);
criterion_main!(benches);
