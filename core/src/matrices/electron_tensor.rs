use std::ops::Index;

use nalgebra::Vector3;

use crate::{basis::BasisFunction, integrate::Integrator};

use super::point3;

/// The four-index two-electron repulsion tensor, `mnls` in the usual
/// notation, over the 6-dimensional two-electron domain.
///
/// Kernel: `b_i(r1) b_j(r1) * 1/|r1 - r2| * b_k(r2) b_l(r2)`.
///
/// The tensor is invariant under the 8 index permutations generated by
/// (i <-> j), (k <-> l) and (ij) <-> (kl). Only one representative per
/// symmetry orbit is handed to the integrator; the estimate is written to
/// all 8 equivalent positions. An explicit `computed` bitmap tracks filled
/// entries, so orbits whose integral happens to be zero are still only
/// evaluated once.
pub struct ElectronRepulsionTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl ElectronRepulsionTensor {
    pub fn from_basis<B, I>(basis: &[B], integrator: &I) -> Self
    where
        B: BasisFunction + Sync,
        I: Integrator + Sync,
    {
        assert_eq!(integrator.dimensions(), 6);
        log::info!("calculating mnls - two electron repulsion tensor");

        let n_basis = basis.len();
        let mut data = vec![0.0; n_basis.pow(4)];
        let mut computed = vec![false; n_basis.pow(4)];

        // one representative per symmetry orbit, in index order
        let mut to_compute = Vec::new();
        for quad in itertools::iproduct!(0..n_basis, 0..n_basis, 0..n_basis, 0..n_basis) {
            if !computed[linear(n_basis, quad)] {
                to_compute.push(quad);
                for equivalent in symmetry_orbit(quad) {
                    computed[linear(n_basis, equivalent)] = true;
                }
            }
        }
        log::debug!(
            "{} unique integrals out of {} tensor entries",
            to_compute.len(),
            data.len()
        );

        for (quad, integral) in compute_integrals(basis, integrator, &to_compute) {
            let (i, j, k, l) = quad;
            log::trace!("eri ({i} {j}|{k} {l}) = {integral:<1.8}");
            for equivalent in symmetry_orbit(quad) {
                data[linear(n_basis, equivalent)] = integral;
            }
        }

        Self {
            data,
            size: n_basis,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

type Quadruple = (usize, usize, usize, usize);

#[cfg(not(feature = "rayon"))]
fn compute_integrals<B, I>(
    basis: &[B],
    integrator: &I,
    quadruples: &[Quadruple],
) -> Vec<(Quadruple, f64)>
where
    B: BasisFunction + Sync,
    I: Integrator + Sync,
{
    quadruples
        .iter()
        .map(|&quad| (quad, repulsion_integral(basis, integrator, quad)))
        .collect()
}

#[cfg(feature = "rayon")]
fn compute_integrals<B, I>(
    basis: &[B],
    integrator: &I,
    quadruples: &[Quadruple],
) -> Vec<(Quadruple, f64)>
where
    B: BasisFunction + Sync,
    I: Integrator + Sync,
{
    use rayon::prelude::*;

    // chunked so each task amortizes the scheduling overhead over many
    // quadrature estimates
    quadruples
        .par_chunks(64)
        .flat_map_iter(|chunk| {
            chunk
                .iter()
                .map(|&quad| (quad, repulsion_integral(basis, integrator, quad)))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn repulsion_integral<B, I>(
    basis: &[B],
    integrator: &I,
    (i, j, k, l): (usize, usize, usize, usize),
) -> f64
where
    B: BasisFunction,
    I: Integrator,
{
    let (base_i, base_j, base_k, base_l) = (&basis[i], &basis[j], &basis[k], &basis[l]);

    integrator.integrate(|sample| {
        let r1 = point3(&sample[..3]);
        let r2 = point3(&sample[3..]);

        base_i.evaluate(&r1) * base_j.evaluate(&r1) * electron_coulomb(&r1, &r2)
            * base_k.evaluate(&r2)
            * base_l.evaluate(&r2)
    })
}

fn electron_coulomb(r1: &Vector3<f64>, r2: &Vector3<f64>) -> f64 {
    (r1 - r2).norm().recip()
}

/// All 8 tensor positions sharing one integral value. May contain
/// duplicates when indices coincide; writes are idempotent.
fn symmetry_orbit(
    (i, j, k, l): (usize, usize, usize, usize),
) -> [(usize, usize, usize, usize); 8] {
    [
        (i, j, k, l),
        (j, i, k, l),
        (i, j, l, k),
        (j, i, l, k),
        (k, l, i, j),
        (l, k, i, j),
        (k, l, j, i),
        (l, k, j, i),
    ]
}

#[inline(always)]
fn linear(size: usize, (i, j, k, l): (usize, usize, usize, usize)) -> usize {
    ((i * size + j) * size + k) * size + l
}

impl Index<(usize, usize, usize, usize)> for ElectronRepulsionTensor {
    type Output = f64;

    fn index(&self, index: (usize, usize, usize, usize)) -> &Self::Output {
        &self.data[linear(self.size, index)]
    }
}
