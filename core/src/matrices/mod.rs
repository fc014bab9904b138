//! Builders for the one-electron integral matrices and the two-electron
//! repulsion tensor. Every entry is a quadrature estimate; only the upper
//! triangle (or one representative per symmetry orbit) is ever integrated.

mod electron_tensor;

pub use electron_tensor::ElectronRepulsionTensor;

use nalgebra::{DMatrix, Vector3};

use crate::{
    basis::{BasisFunction, GaussianBasis},
    integrate::Integrator,
    molecule::Molecule,
    utils,
};

/// Step size of the central-difference Laplacian used by the kinetic term.
const LAPLACIAN_STEP: f64 = 1e-5;

pub(crate) fn point3(sample: &[f64]) -> Vector3<f64> {
    Vector3::new(sample[0], sample[1], sample[2])
}

/// Overlap matrix S with kernel `b_i(r) * b_j(r)`.
///
/// Building S renormalizes the basis as a side effect, hence the `&mut`
/// receiver: the diagonal of the raw matrix yields the normalization that
/// makes every `S[i, i]` unity, the basis coefficients are replaced with it,
/// and the returned matrix is rescaled to match. Subsequent builders must
/// only see the renormalized basis.
pub fn overlap_matrix<I: Integrator>(basis: &mut GaussianBasis, integrator: &I) -> DMatrix<f64> {
    assert_eq!(integrator.dimensions(), 3);
    log::info!("calculating S - orbital overlap matrix");

    let mut overlap = utils::symmetric_matrix(basis.len(), |i, j| {
        let (base_i, base_j) = (&basis[i], &basis[j]);
        let overlap_ij = integrator.integrate(|sample| {
            let r = point3(sample);
            base_i.evaluate(&r) * base_j.evaluate(&r)
        });
        log::trace!("overlap ({i}{j}) = {overlap_ij}");
        overlap_ij
    });

    let norms = overlap.diagonal().map(f64::sqrt);
    log::debug!("renormalizing basis with coefficients {:0.4}", norms);
    basis.renormalize(norms.map(f64::recip).as_slice());

    for i in 0..overlap.nrows() {
        for j in 0..overlap.ncols() {
            overlap[(i, j)] /= norms[i] * norms[j];
        }
    }
    overlap
}

/// Kinetic energy matrix T with kernel `-0.5 * b_i(r) * laplacian(b_j)(r)`.
///
/// The Laplacian is taken numerically, a 3-point central difference per
/// axis applied to the function as a whole.
pub fn kinetic_matrix<B, I>(basis: &[B], integrator: &I) -> DMatrix<f64>
where
    B: BasisFunction,
    I: Integrator,
{
    assert_eq!(integrator.dimensions(), 3);
    log::info!("calculating T - kinetic energy matrix");

    utils::symmetric_matrix(basis.len(), |i, j| {
        let (base_i, base_j) = (&basis[i], &basis[j]);
        let kinetic_ij = integrator.integrate(|sample| {
            let r = point3(sample);
            -0.5 * base_i.evaluate(&r) * laplacian(base_j, &r)
        });
        log::trace!("kinetic ({i}{j}) = {kinetic_ij}");
        kinetic_ij
    })
}

/// Nuclear attraction matrix V with kernel `b_i(r) * V_nuc(r) * b_j(r)`,
/// where `V_nuc` is the molecule's Coulomb potential.
pub fn nuclear_attraction_matrix<B, I>(
    molecule: &Molecule,
    basis: &[B],
    integrator: &I,
) -> DMatrix<f64>
where
    B: BasisFunction,
    I: Integrator,
{
    assert_eq!(integrator.dimensions(), 3);
    log::info!("calculating V_nuc - nuclear attraction matrix");

    utils::symmetric_matrix(basis.len(), |i, j| {
        let (base_i, base_j) = (&basis[i], &basis[j]);
        let nuclear_ij = integrator.integrate(|sample| {
            let r = point3(sample);
            base_i.evaluate(&r) * molecule.nuclear_potential(&r) * base_j.evaluate(&r)
        });
        log::trace!("nuclear ({i}{j}) = {nuclear_ij}");
        nuclear_ij
    })
}

pub(crate) fn laplacian<B: BasisFunction>(function: &B, r: &Vector3<f64>) -> f64 {
    let center = function.evaluate(r);

    let mut laplace = 0.0;
    for axis in 0..3 {
        let mut step = Vector3::zeros();
        step[axis] = LAPLACIAN_STEP;

        laplace += (function.evaluate(&(r + step)) - 2.0 * center
            + function.evaluate(&(r - step)))
            / (LAPLACIAN_STEP * LAPLACIAN_STEP);
    }
    laplace
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::{
        basis::{BasisFunction, Gaussian, GaussianBasis},
        integrate::MonteCarlo,
        molecule::Molecule,
    };

    use super::{kinetic_matrix, laplacian, nuclear_attraction_matrix, overlap_matrix};

    fn h2_like_basis() -> GaussianBasis {
        GaussianBasis::with_unit_coefficients(
            vec![Vector3::zeros(), Vector3::new(0.0, 0.0, 1.4)],
            vec![0.3, 1.2],
        )
    }

    #[test]
    fn overlap_diagonal_is_unity_after_renormalization() {
        let mut basis = h2_like_basis();
        let integrator = MonteCarlo::with_seed(20_000, (-4.0, 4.0), 3, 11);

        let overlap = overlap_matrix(&mut basis, &integrator);

        for i in 0..basis.len() {
            assert_relative_eq!(overlap[(i, i)], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn renormalized_basis_reproduces_unit_diagonal() {
        // an overlap build with the renormalized basis must agree with the
        // rescaled matrix it returned, entry for entry
        let mut basis = h2_like_basis();
        let integrator = MonteCarlo::with_seed(20_000, (-4.0, 4.0), 3, 11);

        let rescaled = overlap_matrix(&mut basis, &integrator);
        let mut renormalized = basis.clone();
        let recomputed = overlap_matrix(&mut renormalized, &integrator);

        for i in 0..basis.len() {
            for j in 0..basis.len() {
                assert_relative_eq!(recomputed[(i, j)], rescaled[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn one_electron_matrices_are_exactly_symmetric() {
        let mut basis = h2_like_basis();
        let molecule = Molecule::new(
            vec![Vector3::zeros(), Vector3::new(0.0, 0.0, 1.4)],
            vec![1, 1],
            2,
        );
        let integrator = MonteCarlo::with_seed(5000, (-4.0, 4.0), 3, 23);

        let overlap = overlap_matrix(&mut basis, &integrator);
        let kinetic = kinetic_matrix(basis.functions(), &integrator);
        let nuclear = nuclear_attraction_matrix(&molecule, basis.functions(), &integrator);

        for matrix in [&overlap, &kinetic, &nuclear] {
            for i in 0..basis.len() {
                for j in 0..basis.len() {
                    // mirrored, not independently estimated: bitwise equal
                    assert_eq!(matrix[(i, j)], matrix[(j, i)]);
                }
            }
        }
    }

    #[test]
    fn finite_difference_laplacian_matches_analytic_form() {
        // laplacian of exp(-a r^2) is (4 a^2 r^2 - 6 a) exp(-a r^2)
        let gaussian = Gaussian {
            exponent: 0.7,
            center: Vector3::zeros(),
            coefficient: 1.0,
        };

        for r in [
            Vector3::new(0.3, -0.2, 0.5),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
        ] {
            let a = gaussian.exponent;
            let analytic =
                (4.0 * a * a * r.norm_squared() - 6.0 * a) * gaussian.evaluate(&r);
            assert_relative_eq!(laplacian(&gaussian, &r), analytic, epsilon = 1e-4);
        }
    }
}
