//! The iterative Roothaan-Hall solver. The procedure follows the 12-step
//! scheme in Szabo & Ostlund, Modern Quantum Chemistry, p. 146.

mod procedure;

pub use procedure::{calculate, ScfProblem, ScfSolution};

use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

use crate::{matrices::ElectronRepulsionTensor, utils};

/// When to stop iterating.
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Forced-stop bound; divergence and oscillation guard.
    pub max_iteration: usize,
    /// Replace the candidate density with the midpoint of old and new
    /// before continuing. Damps oscillating configurations.
    pub averaging: bool,
    /// The density rms deviation below which the field is self-consistent.
    pub delta: f64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            max_iteration: 5000,
            averaging: false,
            delta: 1e-6,
        }
    }
}

/// The evolving state of a self-consistent field calculation.
///
/// All of the density `P`, mean-field `G`, Fock `F`, coefficient `C` and
/// orbital-energy `E` matrices are derived from the same committed density;
/// the candidate `P_new` is one step ahead and only becomes consistent with
/// the rest once [`SelfConsistentField::advance`] commits it.
pub struct SelfConsistentField {
    n_electrons: usize,
    kinetic: DMatrix<f64>,
    nuclear: DMatrix<f64>,
    repulsion: ElectronRepulsionTensor,
    /// Symmetric orthogonalization transform `X = U s^(-1/2) U^T`.
    transform: DMatrix<f64>,
    density: DMatrix<f64>,
    next_density: DMatrix<f64>,
    mean_field: DMatrix<f64>,
    fock: DMatrix<f64>,
    coefficients: DMatrix<f64>,
    orbital_energies: DVector<f64>,
    convergence: ConvergenceConfig,
    iteration: usize,
}

impl SelfConsistentField {
    /// Sets up the iteration state from the molecular integral matrices and
    /// runs the first Roothaan-Hall solve. `initial_density` defaults to the
    /// identity, an arbitrary non-physical seed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n_electrons: usize,
        overlap: &DMatrix<f64>,
        kinetic: DMatrix<f64>,
        nuclear: DMatrix<f64>,
        repulsion: ElectronRepulsionTensor,
        convergence: ConvergenceConfig,
        initial_density: Option<DMatrix<f64>>,
    ) -> Self {
        let n_basis = kinetic.nrows();
        assert_eq!(overlap.nrows(), n_basis);
        assert_eq!(nuclear.nrows(), n_basis);
        assert_eq!(repulsion.size(), n_basis);

        if n_electrons % 2 != 0 {
            log::warn!(
                "{n_electrons} electrons: the restricted closed-shell density \
                 only accounts for the lowest {} doubly occupied orbitals",
                n_electrons / 2
            );
        }

        // diagonalize S once; X symmetrically orthogonalizes the basis
        let (u, s) = utils::eigs(overlap.clone());
        let transform = &u * DMatrix::from_diagonal(&s.map(|s| s.powf(-0.5))) * u.transpose();

        let density = initial_density.unwrap_or_else(|| DMatrix::identity(n_basis, n_basis));
        assert_eq!(density.nrows(), n_basis);

        let mut scf = Self {
            n_electrons,
            kinetic,
            nuclear,
            repulsion,
            transform,
            density,
            next_density: DMatrix::zeros(n_basis, n_basis),
            mean_field: DMatrix::zeros(n_basis, n_basis),
            fock: DMatrix::zeros(n_basis, n_basis),
            coefficients: DMatrix::zeros(n_basis, n_basis),
            orbital_energies: DVector::zeros(n_basis),
            convergence,
            iteration: 1,
        };
        scf.solve();
        scf
    }

    /// Commit the candidate density and recompute everything derived from
    /// it: G, F, C, E and the next candidate.
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.density, &mut self.next_density);
        self.solve();
        self.iteration += 1;
    }

    /// The convergence predicate, to be evaluated once before each
    /// [`SelfConsistentField::advance`]. Returns `true` when iteration must
    /// stop: either the density is self-consistent to within `delta`, or the
    /// iteration budget is spent. With averaging enabled, a non-converged
    /// candidate density is pulled halfway back toward the committed one.
    pub fn converged(&mut self) -> bool {
        let n_basis = self.density.nrows() as f64;
        let epsilon = (&self.density - &self.next_density)
            .map(|entry| entry * entry)
            .sum()
            .sqrt()
            / n_basis;

        log::info!(
            "iteration {:<4} - convergence factor {epsilon:1.4e}",
            self.iteration
        );

        if epsilon <= self.convergence.delta {
            return true;
        }

        if self.convergence.averaging {
            self.next_density = (&self.next_density + &self.density) / 2.0;
        }

        if self.iteration >= self.convergence.max_iteration {
            log::info!(
                "reached {} iterations without convergence: iteration stopped",
                self.iteration
            );
            return true;
        }

        false
    }

    /// One Roothaan-Hall solve against the committed density: build G and
    /// F, diagonalize the transformed Fock matrix, back-transform the
    /// coefficients and form the candidate density.
    fn solve(&mut self) {
        self.mean_field = self.compute_mean_field();
        self.fock = &self.kinetic + &self.nuclear + &self.mean_field;

        let transformed_fock = self.transform.transpose() * &self.fock * &self.transform;
        let (transformed_coefficients, orbital_energies) = utils::sorted_eigs(transformed_fock);
        self.coefficients = &self.transform * transformed_coefficients;
        self.orbital_energies = orbital_energies;

        self.next_density = self.compute_density();
    }

    /// `G[m, n] = sum_ij P[i, j] * (mnls[m, n, j, i] - 0.5 * mnls[m, i, j, n])`,
    /// the Coulomb term minus half the exchange term.
    fn compute_mean_field(&self) -> DMatrix<f64> {
        let n_basis = self.density.nrows();
        DMatrix::from_fn(n_basis, n_basis, |m, n| {
            let mut sum = 0.0;
            for (i, j) in itertools::iproduct!(0..n_basis, 0..n_basis) {
                sum += self.density[(i, j)]
                    * (self.repulsion[(m, n, j, i)] - 0.5 * self.repulsion[(m, i, j, n)]);
            }
            sum
        })
    }

    /// Restricted closed-shell density over the lowest `N / 2` doubly
    /// occupied orbitals: `P[m, n] = 2 sum_a C[m, a] C[n, a]`.
    fn compute_density(&self) -> DMatrix<f64> {
        let n_occupied = self.n_electrons / 2;
        utils::symmetric_matrix(self.density.nrows(), |m, n| {
            let mut sum = 0.0;
            for a in 0..n_occupied {
                sum += self.coefficients[(m, a)] * self.coefficients[(n, a)];
            }
            2.0 * sum
        })
    }

    pub fn density_matrix(&self) -> &DMatrix<f64> {
        &self.density
    }

    pub fn fock_matrix(&self) -> &DMatrix<f64> {
        &self.fock
    }

    pub fn coefficient_matrix(&self) -> &DMatrix<f64> {
        &self.coefficients
    }

    pub fn orbital_energies(&self) -> &DVector<f64> {
        &self.orbital_energies
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, Vector3};

    use crate::{
        basis::GaussianBasis,
        integrate::MonteCarlo,
        matrices::ElectronRepulsionTensor,
    };

    use super::{ConvergenceConfig, SelfConsistentField};

    fn single_function_scf(n_electrons: usize, convergence: ConvergenceConfig) -> SelfConsistentField {
        let basis = GaussianBasis::with_unit_coefficients(vec![Vector3::zeros()], vec![1.0]);
        let integrator = MonteCarlo::with_seed(4000, (-4.0, 4.0), 6, 13);
        let repulsion = ElectronRepulsionTensor::from_basis(basis.functions(), &integrator);

        SelfConsistentField::new(
            n_electrons,
            &DMatrix::from_element(1, 1, 1.0),
            DMatrix::from_element(1, 1, 0.5),
            DMatrix::from_element(1, 1, -1.2),
            repulsion,
            convergence,
            None,
        )
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ConvergenceConfig::default();
        assert_eq!(config.max_iteration, 5000);
        assert!(!config.averaging);
        assert_relative_eq!(config.delta, 1e-6);
    }

    #[test]
    fn loose_threshold_stops_immediately() {
        let mut scf = single_function_scf(
            2,
            ConvergenceConfig {
                delta: 1e9,
                ..ConvergenceConfig::default()
            },
        );
        assert!(scf.converged());
        assert_eq!(scf.iteration(), 1);
    }

    #[test]
    fn iteration_budget_forces_a_stop() {
        // delta zero, so the rms criterion cannot stop the first iteration
        let mut scf = single_function_scf(
            2,
            ConvergenceConfig {
                max_iteration: 1,
                averaging: false,
                delta: 0.0,
            },
        );

        let gap = (&scf.density - &scf.next_density).abs().sum();
        assert!(gap > 0.0, "identity guess must differ from the candidate");

        assert!(scf.converged(), "budget of one iteration is already spent");
        assert_eq!(scf.iteration(), 1);
    }

    #[test]
    fn averaging_halves_the_density_gap() {
        let mut scf = single_function_scf(
            2,
            ConvergenceConfig {
                averaging: true,
                delta: 1e-12,
                ..ConvergenceConfig::default()
            },
        );

        let gap_before = (&scf.density - &scf.next_density).abs().sum();
        assert!(!scf.converged());
        let gap_after = (&scf.density - &scf.next_density).abs().sum();

        assert_relative_eq!(gap_after, gap_before / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_occupied_orbitals_give_a_zero_density() {
        // N = 1 is accepted, but integer division leaves no occupied orbital
        let scf = single_function_scf(1, ConvergenceConfig::default());
        assert_relative_eq!(scf.next_density[(0, 0)], 0.0);
    }

    #[test]
    fn one_by_one_solve_reproduces_the_fock_entry() {
        let mut scf = single_function_scf(2, ConvergenceConfig::default());
        while !scf.converged() {
            scf.advance();
        }

        // with S = 1 the transform is the identity, so E = F and |C| = 1
        assert_relative_eq!(
            scf.orbital_energies()[0],
            scf.fock_matrix()[(0, 0)],
            epsilon = 1e-10
        );
        assert_relative_eq!(scf.coefficient_matrix()[(0, 0)].abs(), 1.0, epsilon = 1e-10);
    }
}
