use nalgebra::Vector3;

/// Static description of the system under calculation: where the nuclei sit,
/// how strongly they attract, and how many electrons surround them.
#[derive(Clone, Debug, PartialEq)]
pub struct Molecule {
    nuclei_positions: Vec<Vector3<f64>>,
    atomic_numbers: Vec<u32>,
    number_of_electrons: usize,
}

impl Molecule {
    pub fn new(
        nuclei_positions: Vec<Vector3<f64>>,
        atomic_numbers: Vec<u32>,
        number_of_electrons: usize,
    ) -> Self {
        assert_eq!(
            nuclei_positions.len(),
            atomic_numbers.len(),
            "every nucleus needs an atomic number"
        );

        Self {
            nuclei_positions,
            atomic_numbers,
            number_of_electrons,
        }
    }

    pub fn nuclei_positions(&self) -> &[Vector3<f64>] {
        &self.nuclei_positions
    }

    pub fn atomic_numbers(&self) -> &[u32] {
        &self.atomic_numbers
    }

    pub fn number_of_electrons(&self) -> usize {
        self.number_of_electrons
    }

    /// The Coulomb potential all nuclei exert at a point:
    /// the sum over nuclei of `-Z_a / |r - R_a|`.
    pub fn nuclear_potential(&self, r: &Vector3<f64>) -> f64 {
        self.nuclei_positions
            .iter()
            .zip(&self.atomic_numbers)
            .map(|(position, &charge)| -(charge as f64) / (r - position).norm())
            .sum()
    }
}
