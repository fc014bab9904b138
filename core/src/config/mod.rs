//! Serde-facing description of a calculation, as read from an input
//! document. Basis and integrator implementations are selected by string
//! tag; an unrecognized tag fails deserialization outright.

use nalgebra::Vector3;
use serde::Deserialize;

use crate::{
    basis::GaussianBasis,
    integrate::MonteCarlo,
    molecule::Molecule,
    scf::{ConvergenceConfig, ScfProblem},
};

/// A full calculation input.
#[derive(Debug, Deserialize)]
pub struct CalculationConfig {
    pub molecule_definition: MoleculeDefinition,
    pub basis: BasisConfig,
    pub integration_config: IntegrationConfig,
    #[serde(default)]
    pub convergence: ConvergenceConfig,
}

impl CalculationConfig {
    /// Instantiate every collaborator the SCF procedure needs. Single-electron
    /// integrals run over a 3-dimensional domain, two-electron integrals over
    /// the corresponding 6-dimensional one, with the same sampling setup.
    pub fn into_problem(self) -> ScfProblem {
        log::info!("initializing molecule");
        let molecule = self.molecule_definition.into();
        log::info!("initializing basis set");
        let basis = self.basis.build();
        log::info!("initializing integrators");
        let integrator_3d = self.integration_config.build(3);
        let integrator_6d = self.integration_config.build(6);

        ScfProblem {
            basis,
            molecule,
            integrator_3d,
            integrator_6d,
            convergence: self.convergence,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoleculeDefinition {
    pub nuclei_positions: Vec<[f64; 3]>,
    pub atomic_numbers: Vec<u32>,
    pub number_of_electrons: usize,
}

impl From<MoleculeDefinition> for Molecule {
    fn from(definition: MoleculeDefinition) -> Self {
        let positions = definition
            .nuclei_positions
            .into_iter()
            .map(Vector3::from)
            .collect();

        Molecule::new(
            positions,
            definition.atomic_numbers,
            definition.number_of_electrons,
        )
    }
}

/// Basis selection by tag. Only the Gaussian family exists today.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BasisConfig {
    Gaussian { params: GaussianBasisParams },
}

#[derive(Debug, Deserialize)]
pub struct GaussianBasisParams {
    pub nuclei_positions: Vec<[f64; 3]>,
    pub alphas: Vec<f64>,
    pub normalization_factors: Vec<Vec<f64>>,
}

impl BasisConfig {
    pub fn build(self) -> GaussianBasis {
        match self {
            Self::Gaussian { params } => {
                let positions = params
                    .nuclei_positions
                    .into_iter()
                    .map(Vector3::from)
                    .collect();
                GaussianBasis::new(positions, params.alphas, params.normalization_factors)
            }
        }
    }
}

/// Integrator selection by tag. Only Monte Carlo exists today.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum IntegrationConfig {
    #[serde(rename = "MC")]
    MonteCarlo {
        n_samples: usize,
        /// (lower, upper), applied to every axis.
        boundaries: (f64, f64),
        /// Fixed RNG seed; omit for entropy.
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl IntegrationConfig {
    pub fn build(&self, dimensions: usize) -> MonteCarlo {
        match *self {
            Self::MonteCarlo {
                n_samples,
                boundaries,
                seed,
            } => match seed {
                Some(seed) => MonteCarlo::with_seed(n_samples, boundaries, dimensions, seed),
                None => MonteCarlo::new(n_samples, boundaries, dimensions),
            },
        }
    }
}
