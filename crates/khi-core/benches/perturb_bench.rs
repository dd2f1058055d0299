use criterion::{criterion_group, criterion_main, Criterion};
use khi_core::perturb::{perturb_density, seed_noise};
use khi_types::config::DensityStructure;
use khi_types::grid::SimGrid;
use khi_types::params::PerturbParams;
use ndarray::Array4;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

fn bench_seed_noise(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("seed_noise_256x192", |b| {
        b.iter(|| black_box(seed_noise(&mut rng, 256, 192)))
    });
}

fn bench_perturb(c: &mut Criterion) {
    let grid = SimGrid::cartesian([64, 96, 48], (80e3, 900e3), 200e3, 100e3, 67.0, 212.0)
        .expect("bench grid");
    let nsscale = Array4::from_elem((7, 64, 96, 48), 1e10);
    let params = PerturbParams::default();

    let mut group = c.benchmark_group("perturb_density_7x64x96x48");
    group.sample_size(10);
    for structure in [DensityStructure::OneSided, DensityStructure::TwoSided] {
        group.bench_function(format!("{structure:?}"), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                let out = perturb_density(&grid, &nsscale, &params, structure, &mut rng)
                    .expect("perturb");
                black_box(out.ns[[0, 32, 48, 24]]);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_seed_noise, bench_perturb);
criterion_main!(benches);
