// src/validation/mod.rs

//! Numerical checks on dense operator matrices: the Hermitian invariant,
//! the condition number and the spectral range.

use crate::core::{QcondError, Result, DEFAULT_HERMITIAN_TOLERANCE};
use nalgebra::DMatrix;
use num_complex::Complex;

/// Largest element-wise deviation `max_ij |A_ij - conj(A_ji)|`.
///
/// Returns `f64::INFINITY` for non-square input, which can never be Hermitian.
pub fn hermitian_deviation(matrix: &DMatrix<Complex<f64>>) -> f64 {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return f64::INFINITY;
    }
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in i..n {
            let diff = matrix[(i, j)] - matrix[(j, i)].conj();
            worst = worst.max(diff.norm());
        }
    }
    worst
}

/// Checks that the matrix equals its own conjugate transpose.
///
/// # Arguments
/// * `matrix` - Dense operator to check.
/// * `tolerance` - Allowed element-wise deviation. Defaults to `1e-10`.
///
/// # Returns
/// * `Ok(())` if Hermitian within tolerance.
/// * `Err(QcondError::NonHermitian)` otherwise.
pub fn check_hermitian(matrix: &DMatrix<Complex<f64>>, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_HERMITIAN_TOLERANCE);
    let deviation = hermitian_deviation(matrix);
    if deviation > effective_tolerance {
        Err(QcondError::NonHermitian { deviation, tolerance: effective_tolerance })
    } else {
        Ok(())
    }
}

/// Ratio of largest to smallest singular value.
///
/// Singular (or all-zero) matrices yield `f64::INFINITY` rather than an
/// error: an extreme condition number is itself a meaningful answer here.
pub fn condition_number(matrix: &DMatrix<Complex<f64>>) -> f64 {
    if matrix.is_empty() {
        return f64::INFINITY;
    }
    let singular_values = matrix.singular_values();
    let max = singular_values.max();
    let min = singular_values.min();
    if min <= 0.0 || !min.is_finite() || !max.is_finite() {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Smallest and largest eigenvalue of a Hermitian matrix.
///
/// Only the lower triangle is read, so the result is meaningless for
/// matrices that fail `check_hermitian`.
pub fn spectral_range(matrix: &DMatrix<Complex<f64>>) -> (f64, f64) {
    let eigenvalues = matrix.symmetric_eigenvalues();
    (eigenvalues.min(), eigenvalues.max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pauli, PauliString};

    const TEST_TOLERANCE: f64 = 1e-9;

    fn diag(values: &[f64]) -> DMatrix<Complex<f64>> {
        let n = values.len();
        DMatrix::from_fn(n, n, |i, j| if i == j { Complex::new(values[i], 0.0) } else { Complex::new(0.0, 0.0) })
    }

    #[test]
    fn test_hermitian_accepts_pauli_y() {
        assert!(check_hermitian(&Pauli::Y.dense(), None).is_ok());
    }

    #[test]
    fn test_hermitian_rejects_skew_matrix() {
        // i * Y = [[0, 1], [-1, 0]] is real antisymmetric.
        let skew = Pauli::Y.dense().map(|z| z * Complex::i());
        match check_hermitian(&skew, None) {
            Err(QcondError::NonHermitian { deviation, .. }) => {
                assert!((deviation - 2.0).abs() < TEST_TOLERANCE, "deviation was {}", deviation);
            }
            other => panic!("expected NonHermitian, got {:?}", other),
        }
    }

    #[test]
    fn test_hermitian_rejects_non_square() {
        let m = DMatrix::from_element(2, 3, Complex::new(0.0, 0.0));
        assert_eq!(hermitian_deviation(&m), f64::INFINITY);
    }

    #[test]
    fn test_condition_number_of_diagonal() {
        let kappa = condition_number(&diag(&[4.0, -2.0, 0.5]));
        assert!((kappa - 8.0).abs() < TEST_TOLERANCE, "kappa was {}", kappa);
    }

    #[test]
    fn test_condition_number_of_unitary_is_one() -> Result<()> {
        let m = "XYZ".parse::<PauliString>()?.to_dense();
        assert!((condition_number(&m) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_singular_matrix_is_infinitely_conditioned() {
        assert!(condition_number(&diag(&[1.0, 0.0])) > 1e12);
        assert!(condition_number(&diag(&[0.0, 0.0])).is_infinite());
    }

    #[test]
    fn test_spectral_range_of_x() {
        let (lo, hi) = spectral_range(&Pauli::X.dense());
        assert!((lo + 1.0).abs() < TEST_TOLERANCE);
        assert!((hi - 1.0).abs() < TEST_TOLERANCE);
    }
}
