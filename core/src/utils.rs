use nalgebra::{DMatrix, DVector, SymmetricEigen};

#[inline(always)]
/// Create a symmetric, square matrix. Function is only run for the upper
/// triangle; the lower triangle is mirrored, never recomputed.
pub(crate) fn symmetric_matrix(
    n: usize,
    mut func: impl FnMut(usize, usize) -> f64,
) -> DMatrix<f64> {
    let m = DMatrix::from_fn(n, n, |i, j| if i <= j { func(i, j) } else { 0.0 });
    DMatrix::from_fn(n, n, |i, j| if i <= j { m[(i, j)] } else { m[(j, i)] })
}

pub(crate) fn eigs(matrix: DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let eigs = SymmetricEigen::new(matrix);
    (eigs.eigenvectors, eigs.eigenvalues)
}

/// Eigen-decomposition with eigenpairs sorted by ascending eigenvalue, so
/// that the occupied (lowest) orbitals come first.
pub(crate) fn sorted_eigs(matrix: DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let (eigenvectors, eigenvalues) = eigs(matrix);

    let mut val_vec_pairs = eigenvalues
        .into_iter()
        .zip(eigenvectors.column_iter())
        .collect::<Vec<_>>();

    val_vec_pairs.sort_unstable_by(|(a, _), (b, _)| a.total_cmp(b));

    let (values, vectors): (Vec<_>, Vec<_>) = val_vec_pairs.into_iter().unzip();

    (
        DMatrix::from_columns(&vectors),
        DVector::from_column_slice(&values),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    use super::{sorted_eigs, symmetric_matrix};

    #[test]
    fn symmetric_matrix_runs_generator_once_per_pair() {
        let mut calls = 0;
        let m = symmetric_matrix(3, |i, j| {
            calls += 1;
            (i + 10 * j) as f64
        });

        assert_eq!(calls, 6);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], m[(j, i)]);
            }
        }
    }

    #[test]
    fn sorted_eigs_orders_ascending() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, -1.0]);
        let (vectors, values) = sorted_eigs(m);

        assert_relative_eq!(values[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(vectors[(1, 0)].abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(vectors[(0, 1)].abs(), 1.0, epsilon = 1e-12);
    }
}
