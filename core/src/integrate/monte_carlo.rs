use rand::{rngs::StdRng, Rng, SeedableRng};

use super::Integrator;

/// Plain Monte Carlo estimator over a d-dimensional hyper-cube.
///
/// All sample points are drawn once, at construction. Every call to
/// [`Integrator::integrate`] reuses the same sample set, so the quadrature
/// noise is correlated across all matrix entries estimated by one instance.
/// That is intentional: it makes whole-matrix results reproducible and keeps
/// the relative structure of the matrices stable.
///
/// Bias and variance are governed by the sample count and the domain size;
/// both are the caller's responsibility. The estimator never reports
/// non-convergence.
pub struct MonteCarlo {
    n_samples: usize,
    lower_bound: f64,
    upper_bound: f64,
    dimensions: usize,
    /// Flat sample storage, `dimensions` consecutive coordinates per point.
    samples: Vec<f64>,
}

impl MonteCarlo {
    /// Samples are drawn uniformly over `[boundaries.0, boundaries.1)` on
    /// every axis, from entropy.
    pub fn new(n_samples: usize, boundaries: (f64, f64), dimensions: usize) -> Self {
        Self::draw(n_samples, boundaries, dimensions, StdRng::from_entropy())
    }

    /// Like [`MonteCarlo::new`], but seeded. Two instances built with the
    /// same arguments produce bit-identical estimates.
    pub fn with_seed(
        n_samples: usize,
        boundaries: (f64, f64),
        dimensions: usize,
        seed: u64,
    ) -> Self {
        Self::draw(n_samples, boundaries, dimensions, StdRng::seed_from_u64(seed))
    }

    fn draw(
        n_samples: usize,
        (lower_bound, upper_bound): (f64, f64),
        dimensions: usize,
        mut rng: StdRng,
    ) -> Self {
        assert!(n_samples > 0, "integrator needs at least one sample");
        assert!(
            lower_bound < upper_bound,
            "integration domain must not be empty"
        );

        let samples = (0..n_samples * dimensions)
            .map(|_| rng.gen_range(lower_bound..upper_bound))
            .collect();

        log::debug!(
            "drew {n_samples} {dimensions}-dimensional samples over [{lower_bound}, {upper_bound}]"
        );

        Self {
            n_samples,
            lower_bound,
            upper_bound,
            dimensions,
            samples,
        }
    }
}

impl Integrator for MonteCarlo {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn integrate<F>(&self, field: F) -> f64
    where
        F: Fn(&[f64]) -> f64,
    {
        let volume = (self.upper_bound - self.lower_bound).powi(self.dimensions as i32);
        let mean = self
            .samples
            .chunks_exact(self.dimensions)
            .map(&field)
            .sum::<f64>()
            / self.n_samples as f64;

        mean * volume
    }
}
