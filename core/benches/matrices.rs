use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use scf_core::{
    basis::GaussianBasis,
    integrate::MonteCarlo,
    matrices::{kinetic_matrix, nuclear_attraction_matrix, overlap_matrix, ElectronRepulsionTensor},
    molecule::Molecule,
};

fn h2_basis() -> GaussianBasis {
    GaussianBasis::with_unit_coefficients(
        vec![Vector3::zeros(), Vector3::new(0.0, 0.0, 1.4)],
        vec![0.3, 1.2, 4.8],
    )
}

fn bench_matrices(c: &mut Criterion) {
    let molecule = Molecule::new(
        vec![Vector3::zeros(), Vector3::new(0.0, 0.0, 1.4)],
        vec![1, 1],
        2,
    );
    let integrator_3d = MonteCarlo::with_seed(10_000, (-4.0, 4.0), 3, 1);
    let integrator_6d = MonteCarlo::with_seed(10_000, (-4.0, 4.0), 6, 2);

    c.bench_function("overlap h2", |b| {
        b.iter(|| overlap_matrix(&mut h2_basis(), &integrator_3d))
    });

    let basis = h2_basis();
    c.bench_function("kinetic h2", |b| {
        b.iter(|| kinetic_matrix(basis.functions(), &integrator_3d))
    });

    c.bench_function("nuclear h2", |b| {
        b.iter(|| nuclear_attraction_matrix(&molecule, basis.functions(), &integrator_3d))
    });

    c.bench_function("electron repulsion h2", |b| {
        b.iter(|| ElectronRepulsionTensor::from_basis(basis.functions(), &integrator_6d))
    });
}

criterion_group!(benches, bench_matrices);
criterion_main!(benches);
