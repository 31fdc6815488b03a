//! Symmetric eigendecomposition via the cyclic Jacobi method.
//!
//! Covariance matrices in this crate are small and dense (hundreds of
//! securities at most), a regime where Jacobi sweeps are simple and
//! numerically well behaved. Each sweep rotates every upper-triangle
//! pair once; iteration stops when the largest off-diagonal entry
//! falls below tolerance.

use ndarray::{Array1, Array2};

use crate::error::{ModelError, Result};

/// Sweep budget for [`symmetric_eigen`].
pub const MAX_SWEEPS: usize = 64;

/// Convergence tolerance on the largest absolute off-diagonal entry.
pub const TOLERANCE: f64 = 1e-12;

/// Eigenvalues and eigenvectors of a symmetric matrix.
///
/// Eigenvalues are sorted in descending order and `eigenvectors`
/// holds the matching eigenvectors as columns. Each column is flipped
/// so that its largest-magnitude entry is positive, which makes the
/// decomposition deterministic.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues, descending
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns, aligned with `eigenvalues`
    pub eigenvectors: Array2<f64>,
}

/// Decompose a symmetric matrix with the default sweep budget and
/// tolerance.
///
/// # Errors
///
/// Returns [`ModelError::DimensionMismatch`] if the matrix is not
/// square, and [`ModelError::NotConverged`] if the off-diagonal mass
/// does not vanish within [`MAX_SWEEPS`] sweeps.
///
/// # Example
///
/// ```
/// use hobart_model::eigen::symmetric_eigen;
/// use ndarray::array;
///
/// let matrix = array![[2.0, 1.0], [1.0, 2.0]];
/// let eigen = symmetric_eigen(&matrix)?;
/// assert!((eigen.eigenvalues[0] - 3.0).abs() < 1e-9);
/// # Ok::<(), hobart_model::ModelError>(())
/// ```
pub fn symmetric_eigen(matrix: &Array2<f64>) -> Result<EigenDecomposition> {
    symmetric_eigen_with(matrix, MAX_SWEEPS, TOLERANCE)
}

/// Decompose a symmetric matrix with an explicit sweep budget and
/// tolerance.
///
/// # Errors
///
/// Returns [`ModelError::DimensionMismatch`] if the matrix is not
/// square, and [`ModelError::NotConverged`] if the off-diagonal mass
/// does not vanish within `max_sweeps` sweeps.
pub fn symmetric_eigen_with(
    matrix: &Array2<f64>,
    max_sweeps: usize,
    tolerance: f64,
) -> Result<EigenDecomposition> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(ModelError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let mut work = matrix.clone();
    let mut vectors = Array2::<f64>::eye(n);

    let mut sweeps = 0;
    while largest_off_diagonal(&work) >= tolerance {
        if sweeps == max_sweeps {
            return Err(ModelError::NotConverged { sweeps });
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if work[[p, q]].abs() < tolerance {
                    continue;
                }
                let (cos, sin) = rotation_for(work[[p, p]], work[[q, q]], work[[p, q]]);
                apply_rotation(&mut work, &mut vectors, p, q, cos, sin);
            }
        }
        sweeps += 1;
    }

    Ok(sorted_decomposition(work.diag().to_owned(), vectors))
}

/// Largest absolute entry above the diagonal.
fn largest_off_diagonal(matrix: &Array2<f64>) -> f64 {
    let n = matrix.nrows();
    let mut largest = 0.0_f64;
    for p in 0..n {
        for q in (p + 1)..n {
            largest = largest.max(matrix[[p, q]].abs());
        }
    }
    largest
}

/// Rotation angle that annihilates the `(p, q)` entry.
///
/// Uses the stable parametrization `t = sign(tau) / (|tau| + sqrt(1 + tau^2))`
/// with `tau = (a_qq - a_pp) / (2 a_pq)`, which picks the smaller of
/// the two candidate angles.
fn rotation_for(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    let tau = (aqq - app) / (2.0 * apq);
    let t = tau.signum() / (tau.abs() + tau.hypot(1.0));
    let cos = 1.0 / (1.0 + t * t).sqrt();
    let sin = t * cos;
    (cos, sin)
}

/// Apply the Givens rotation `J(p, q)` as `Jᵀ A J` in place and
/// accumulate it into the eigenvector matrix.
fn apply_rotation(
    matrix: &mut Array2<f64>,
    vectors: &mut Array2<f64>,
    p: usize,
    q: usize,
    cos: f64,
    sin: f64,
) {
    let n = matrix.nrows();
    let app = matrix[[p, p]];
    let aqq = matrix[[q, q]];
    let apq = matrix[[p, q]];

    matrix[[p, p]] = cos * cos * app - 2.0 * sin * cos * apq + sin * sin * aqq;
    matrix[[q, q]] = sin * sin * app + 2.0 * sin * cos * apq + cos * cos * aqq;
    matrix[[p, q]] = 0.0;
    matrix[[q, p]] = 0.0;

    for i in 0..n {
        if i == p || i == q {
            continue;
        }
        let aip = matrix[[i, p]];
        let aiq = matrix[[i, q]];
        matrix[[i, p]] = cos * aip - sin * aiq;
        matrix[[p, i]] = matrix[[i, p]];
        matrix[[i, q]] = sin * aip + cos * aiq;
        matrix[[q, i]] = matrix[[i, q]];
    }

    for i in 0..n {
        let vip = vectors[[i, p]];
        let viq = vectors[[i, q]];
        vectors[[i, p]] = cos * vip - sin * viq;
        vectors[[i, q]] = sin * vip + cos * viq;
    }
}

/// Sort eigenpairs descending by eigenvalue and orient every column.
fn sorted_decomposition(eigenvalues: Array1<f64>, eigenvectors: Array2<f64>) -> EigenDecomposition {
    let n = eigenvalues.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigenvalues[b]
            .partial_cmp(&eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut sorted_values = Array1::<f64>::zeros(n);
    let mut sorted_vectors = Array2::<f64>::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        sorted_values[dst] = eigenvalues[src];
        let mut column = eigenvectors.column(src).to_owned();
        orient_column(&mut column);
        sorted_vectors.column_mut(dst).assign(&column);
    }

    EigenDecomposition {
        eigenvalues: sorted_values,
        eigenvectors: sorted_vectors,
    }
}

/// Flip a column's sign when its largest-magnitude entry is negative.
///
/// Ties keep the first occurrence, matching an argmax over absolute
/// values.
fn orient_column(column: &mut Array1<f64>) {
    let mut lead = 0.0_f64;
    for &x in column.iter() {
        if x.abs() > lead.abs() {
            lead = x;
        }
    }
    if lead < 0.0 {
        column.mapv_inplace(|x| -x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_identity_matrix() {
        let eigen = symmetric_eigen(&Array2::eye(4)).unwrap();
        for i in 0..4 {
            assert_relative_eq!(eigen.eigenvalues[i], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_diagonal_matrix_sorted_descending() {
        let matrix = Array2::from_diag(&array![1.0, 5.0, 3.0]);
        let eigen = symmetric_eigen(&matrix).unwrap();
        assert_relative_eq!(eigen.eigenvalues[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(eigen.eigenvalues[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(eigen.eigenvalues[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_known_two_by_two() {
        let matrix = array![[2.0, 1.0], [1.0, 2.0]];
        let eigen = symmetric_eigen(&matrix).unwrap();
        assert_relative_eq!(eigen.eigenvalues[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(eigen.eigenvalues[1], 1.0, epsilon = 1e-9);

        let inv_sqrt2 = 1.0 / 2.0_f64.sqrt();
        assert_relative_eq!(eigen.eigenvectors[[0, 0]], inv_sqrt2, epsilon = 1e-9);
        assert_relative_eq!(eigen.eigenvectors[[1, 0]], inv_sqrt2, epsilon = 1e-9);
    }

    #[test]
    fn test_reconstruction() {
        let matrix = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let eigen = symmetric_eigen(&matrix).unwrap();
        let lambda = Array2::from_diag(&eigen.eigenvalues);
        let rebuilt = eigen.eigenvectors.dot(&lambda).dot(&eigen.eigenvectors.t());
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rebuilt[[i, j]], matrix[[i, j]], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_eigenvectors_are_orthonormal() {
        let matrix = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let eigen = symmetric_eigen(&matrix).unwrap();
        let gram = eigen.eigenvectors.t().dot(&eigen.eigenvectors);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(gram[[i, j]], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_columns_lead_with_positive_entries() {
        let matrix = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.5, 0.2, 2.0]];
        let eigen = symmetric_eigen(&matrix).unwrap();
        for j in 0..3 {
            let column = eigen.eigenvectors.column(j);
            let lead = column
                .iter()
                .fold(0.0_f64, |acc, &x| if x.abs() > acc.abs() { x } else { acc });
            assert!(lead > 0.0, "column {} leads with {}", j, lead);
        }
    }

    #[test]
    fn test_non_square_is_loud() {
        let matrix = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            symmetric_eigen(&matrix),
            Err(ModelError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_exhausted_sweep_budget_is_loud() {
        let matrix = array![[2.0, 1.0], [1.0, 2.0]];
        assert!(matches!(
            symmetric_eigen_with(&matrix, 0, 1e-12),
            Err(ModelError::NotConverged { sweeps: 0 })
        ));
    }

    #[test]
    fn test_empty_matrix() {
        let eigen = symmetric_eigen(&Array2::<f64>::zeros((0, 0))).unwrap();
        assert!(eigen.eigenvalues.is_empty());
        assert_eq!(eigen.eigenvectors.dim(), (0, 0));
    }
}
