//! Dense linear solver used for the box corner systems
//!
//! LU factorization with partial pivoting. Singularity is judged relative to
//! the largest coefficient, so nearly parallel plane normals are rejected
//! instead of producing corners far away from the hull.

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Errors that can occur while solving a linear system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Matrix is singular or nearly singular")]
    SingularMatrix,
    #[error("Matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Solves square systems `A·x = b`.
///
/// Implementations must be stateless across calls: one instance is shared by
/// every corner solve of a box computation and may be used from several
/// threads.
pub trait LinearSolver: Send + Sync {
    fn solve(&self, a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, SolveError>;
}

/// LU factorization result
///
/// Stores L and U factors along with pivot information
#[derive(Debug, Clone)]
pub struct LuFactorization {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    pub lu: Array2<f64>,
    /// Row permutation applied during elimination
    pub pivots: Vec<usize>,
    pub n: usize,
}

impl LuFactorization {
    /// Solve Ax = b using the pre-computed LU factorization
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>, SolveError> {
        if b.len() != self.n {
            return Err(SolveError::DimensionMismatch {
                expected: self.n,
                got: b.len(),
            });
        }

        let mut x: Array1<f64> = self.pivots.iter().map(|&p| b[p]).collect();

        // Forward substitution: Ly = Pb
        for i in 0..self.n {
            for j in 0..i {
                x[i] -= self.lu[[i, j]] * x[j];
            }
        }

        // Backward substitution: Ux = y
        for i in (0..self.n).rev() {
            for j in (i + 1)..self.n {
                x[i] -= self.lu[[i, j]] * x[j];
            }
            x[i] /= self.lu[[i, i]];
        }

        Ok(x)
    }
}

/// Compute LU factorization with partial pivoting.
///
/// A pivot smaller than `relative_tolerance` times the largest absolute
/// coefficient of `a` marks the matrix as singular.
pub fn lu_factorize(a: &Array2<f64>, relative_tolerance: f64) -> Result<LuFactorization, SolveError> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(SolveError::DimensionMismatch {
            expected: n,
            got: a.ncols(),
        });
    }

    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(SolveError::SingularMatrix);
    }
    let threshold = relative_tolerance * scale;

    let mut lu = a.clone();
    let mut pivots: Vec<usize> = (0..n).collect();

    for k in 0..n {
        // Find pivot
        let mut max_val = lu[[k, k]].abs();
        let mut max_row = k;

        for i in (k + 1)..n {
            let val = lu[[i, k]].abs();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        if max_val <= threshold {
            return Err(SolveError::SingularMatrix);
        }

        if max_row != k {
            for j in 0..n {
                lu.swap([k, j], [max_row, j]);
            }
            pivots.swap(k, max_row);
        }

        // Compute multipliers and eliminate
        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            lu[[i, k]] = mult;

            for j in (k + 1)..n {
                let update = mult * lu[[k, j]];
                lu[[i, j]] -= update;
            }
        }
    }

    Ok(LuFactorization { lu, pivots, n })
}

/// Direct LU solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuSolver {
    /// Pivot threshold relative to the largest coefficient
    pub pivot_tolerance: f64,
}

impl Default for LuSolver {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-12,
        }
    }
}

impl LinearSolver for LuSolver {
    fn solve(&self, a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, SolveError> {
        lu_factorize(a, self.pivot_tolerance)?.solve(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_lu_solve_3x3() {
        let a = array![[4.0_f64, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let b = array![1.0_f64, 2.0, 3.0];

        let x = LuSolver::default().solve(&a, &b).expect("LU solve should succeed");

        // Verify: Ax = b
        let ax = a.dot(&x);
        for i in 0..3 {
            assert_relative_eq!(ax[i], b[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lu_needs_pivoting() {
        let a = array![[0.0_f64, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let b = array![2.0_f64, 3.0, 4.0];

        let x = LuSolver::default().solve(&a, &b).unwrap();
        assert_relative_eq!(x[0], 3.0, epsilon = 1e-14);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-14);
        assert_relative_eq!(x[2], 4.0, epsilon = 1e-14);
    }

    #[test]
    fn test_lu_singular() {
        // third row is the sum of the first two
        let a = array![[1.0_f64, 2.0, 0.0], [0.0, 1.0, 1.0], [1.0, 3.0, 1.0]];
        let b = array![1.0_f64, 2.0, 3.0];

        assert_eq!(
            LuSolver::default().solve(&a, &b),
            Err(SolveError::SingularMatrix)
        );
    }

    #[test]
    fn test_lu_zero_matrix() {
        let a = Array2::<f64>::zeros((3, 3));
        let b = Array1::<f64>::zeros(3);
        assert!(LuSolver::default().solve(&a, &b).is_err());
    }

    #[test]
    fn test_lu_factorize_and_solve_many() {
        let a = array![[2.0_f64, -1.0, 0.5], [0.3, 1.0, 1.0], [0.0, 1.0, 3.0]];
        let factorization = lu_factorize(&a, 1e-12).expect("Factorization should succeed");

        for b in [array![1.0_f64, 0.0, 0.0], array![4.0_f64, 5.0, 6.0]] {
            let x = factorization.solve(&b).expect("Solve should succeed");
            let ax = a.dot(&x);
            for i in 0..3 {
                assert_relative_eq!(ax[i], b[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = array![[1.0_f64, 0.0], [0.0, 1.0]];
        let b = array![1.0_f64, 2.0, 3.0];
        assert_eq!(
            LuSolver::default().solve(&a, &b),
            Err(SolveError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );

        let rect = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            lu_factorize(&rect, 1e-12),
            Err(SolveError::DimensionMismatch { .. })
        ));
    }
}
