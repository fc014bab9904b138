use nalgebra::{DMatrix, DVector, Vector3};

use crate::{
    basis::{BasisFunction, GaussianBasis},
    integrate::{Integrator, MonteCarlo},
    matrices::{
        kinetic_matrix, nuclear_attraction_matrix, overlap_matrix, ElectronRepulsionTensor,
    },
    molecule::Molecule,
};

use super::{ConvergenceConfig, SelfConsistentField};

/// Everything a self-consistent field calculation consumes. The basis is
/// taken by value: building the overlap matrix renormalizes it, and the
/// solution hands the renormalized set back for density sampling.
pub struct ScfProblem {
    pub basis: GaussianBasis,
    pub molecule: Molecule,
    pub integrator_3d: MonteCarlo,
    pub integrator_6d: MonteCarlo,
    pub convergence: ConvergenceConfig,
}

/// The terminal state of a converged (or forcibly stopped) calculation.
/// All exposed matrices are mutually consistent with the committed density.
pub struct ScfSolution {
    basis: GaussianBasis,
    scf: SelfConsistentField,
}

/// Build the molecular integral matrices and iterate the Roothaan-Hall
/// equations until the convergence predicate signals stop.
///
/// The overlap matrix is built first; it must be, since it renormalizes the
/// basis every other builder reads.
pub fn calculate(problem: ScfProblem) -> ScfSolution {
    let ScfProblem {
        mut basis,
        molecule,
        integrator_3d,
        integrator_6d,
        convergence,
    } = problem;

    assert_eq!(integrator_3d.dimensions(), 3);
    assert_eq!(integrator_6d.dimensions(), 6);

    let overlap = overlap_matrix(&mut basis, &integrator_3d);
    log::debug!("overlap matrix: {overlap:0.4}");
    let kinetic = kinetic_matrix(basis.functions(), &integrator_3d);
    log::debug!("kinetic matrix: {kinetic:0.4}");
    let nuclear = nuclear_attraction_matrix(&molecule, basis.functions(), &integrator_3d);
    log::debug!("nuclear matrix: {nuclear:0.4}");
    let repulsion = ElectronRepulsionTensor::from_basis(basis.functions(), &integrator_6d);

    let mut scf = SelfConsistentField::new(
        molecule.number_of_electrons(),
        &overlap,
        kinetic,
        nuclear,
        repulsion,
        convergence,
        None,
    );

    log::info!("running iterative SCF procedure");
    while !scf.converged() {
        scf.advance();
    }

    ScfSolution { basis, scf }
}

impl ScfSolution {
    pub fn orbital_energies(&self) -> &DVector<f64> {
        self.scf.orbital_energies()
    }

    pub fn density_matrix(&self) -> &DMatrix<f64> {
        self.scf.density_matrix()
    }

    pub fn fock_matrix(&self) -> &DMatrix<f64> {
        self.scf.fock_matrix()
    }

    pub fn coefficient_matrix(&self) -> &DMatrix<f64> {
        self.scf.coefficient_matrix()
    }

    pub fn iterations(&self) -> usize {
        self.scf.iteration()
    }

    /// The renormalized basis the calculation ran with.
    pub fn basis(&self) -> &GaussianBasis {
        &self.basis
    }

    /// The continuous electron density `rho(r) = sum_ij P[i, j] b_i(r) b_j(r)`,
    /// evaluated at a batch of points.
    pub fn electron_density(&self, points: &[Vector3<f64>]) -> Vec<f64> {
        let density = self.scf.density_matrix();

        points
            .iter()
            .map(|r| {
                let values: Vec<f64> = self.basis.iter().map(|b| b.evaluate(r)).collect();

                let mut rho = 0.0;
                for (i, bi) in values.iter().enumerate() {
                    for (j, bj) in values.iter().enumerate() {
                        rho += density[(i, j)] * bi * bj;
                    }
                }
                rho
            })
            .collect()
    }
}
