mod monte_carlo;

pub use monte_carlo::MonteCarlo;

/// Numerical quadrature over a fixed finite domain.
///
/// A `field` maps one d-dimensional sample point, passed as a `&[f64]` of
/// length [`Integrator::dimensions`], to a scalar. Implementations estimate
/// the integral of the field over their whole domain.
pub trait Integrator {
    /// Dimensionality of the sample points handed to the field.
    fn dimensions(&self) -> usize;

    fn integrate<F>(&self, field: F) -> f64
    where
        F: Fn(&[f64]) -> f64;
}
