mod gaussian;

pub use gaussian::{Gaussian, GaussianBasis};

use nalgebra::Vector3;

/// A scalar spatial basis function. The integral builders only ever need to
/// evaluate one, so this is the whole capability surface.
///
/// Implementations are assumed real-valued; none of the integral kernels
/// apply a conjugate.
pub trait BasisFunction {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;
}
