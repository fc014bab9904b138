use std::ops::Index;

use nalgebra::Vector3;

use super::BasisFunction;

/// A single s-type Gaussian primitive, `coefficient * exp(-exponent * |r - center|^2)`.
///
/// Immutable once built; renormalization replaces the function wholesale
/// instead of mutating it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gaussian {
    pub exponent: f64,
    pub center: Vector3<f64>,
    /// The coefficient in front of the exponential, carrying the
    /// normalization once the basis has been renormalized.
    pub coefficient: f64,
}

impl BasisFunction for Gaussian {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.coefficient * (-self.exponent * (r - self.center).norm_squared()).exp()
    }
}

/// An ordered set of [`Gaussian`] functions, one per (nucleus, exponent)
/// pair. The exponent table is shared across nuclei; the coefficient table
/// holds one row per nucleus, one column per exponent.
///
/// The (nucleus, exponent) -> function-index mapping is fixed for the
/// lifetime of the set: [`GaussianBasis::renormalize`] regenerates the
/// functions in the exact same order with only coefficients changed.
#[derive(Clone, Debug)]
pub struct GaussianBasis {
    nuclei_positions: Vec<Vector3<f64>>,
    exponents: Vec<f64>,
    coefficients: Vec<Vec<f64>>,
    functions: Vec<Gaussian>,
}

impl GaussianBasis {
    pub fn new(
        nuclei_positions: Vec<Vector3<f64>>,
        exponents: Vec<f64>,
        coefficients: Vec<Vec<f64>>,
    ) -> Self {
        assert_eq!(
            nuclei_positions.len(),
            coefficients.len(),
            "one coefficient row per nucleus"
        );
        for row in &coefficients {
            assert_eq!(
                row.len(),
                exponents.len(),
                "one coefficient per exponent in every row"
            );
        }

        let functions = build_functions(&nuclei_positions, &exponents, &coefficients);
        Self {
            nuclei_positions,
            exponents,
            coefficients,
            functions,
        }
    }

    /// A basis with every coefficient set to one, the usual starting point
    /// before the overlap matrix fixes the normalization.
    pub fn with_unit_coefficients(nuclei_positions: Vec<Vector3<f64>>, exponents: Vec<f64>) -> Self {
        let coefficients = vec![vec![1.0; exponents.len()]; nuclei_positions.len()];
        Self::new(nuclei_positions, exponents, coefficients)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[Gaussian] {
        &self.functions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gaussian> {
        self.functions.iter()
    }

    /// Replace the coefficient table with `coefficients` (flat, in function
    /// order) and rebuild every function. The ordering of the regenerated
    /// functions is identical to the original construction.
    pub fn renormalize(&mut self, coefficients: &[f64]) {
        assert_eq!(
            coefficients.len(),
            self.functions.len(),
            "one coefficient per basis function"
        );

        let n_exponents = self.exponents.len();
        for (row, chunk) in self
            .coefficients
            .iter_mut()
            .zip(coefficients.chunks_exact(n_exponents))
        {
            row.copy_from_slice(chunk);
        }

        self.functions = build_functions(&self.nuclei_positions, &self.exponents, &self.coefficients);
    }
}

fn build_functions(
    nuclei_positions: &[Vector3<f64>],
    exponents: &[f64],
    coefficients: &[Vec<f64>],
) -> Vec<Gaussian> {
    let mut functions = Vec::with_capacity(nuclei_positions.len() * exponents.len());
    for (&center, row) in nuclei_positions.iter().zip(coefficients) {
        for (&exponent, &coefficient) in exponents.iter().zip(row) {
            functions.push(Gaussian {
                exponent,
                center,
                coefficient,
            });
        }
    }
    functions
}

impl Index<usize> for GaussianBasis {
    type Output = Gaussian;

    fn index(&self, index: usize) -> &Self::Output {
        &self.functions[index]
    }
}

impl<'a> IntoIterator for &'a GaussianBasis {
    type Item = &'a Gaussian;
    type IntoIter = std::slice::Iter<'a, Gaussian>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
