//! Direct solver for tridiagonal linear systems.
//!
//! Uses the Thomas algorithm (Gaussian elimination without pivoting,
//! specialised to three diagonals), $O(n)$ in time and memory. Elimination
//! without pivoting is stable when the matrix is strictly diagonally
//! dominant, which holds for the natural-spline system:
//! $|2(h_{i-1} + h_i)| > |h_{i-1}| + |h_i|$ for positive spacings.

use crate::interpolant::InterpError;

/// Solve $\mathbf{T}\mathbf{x} = \mathbf{r}$ for a tridiagonal $\mathbf{T}$.
///
/// # Arguments
/// * `sub` - Sub-diagonal, `sub[i] = T[i+1][i]` (length $n-1$).
/// * `diag` - Main diagonal (length $n$).
/// * `sup` - Super-diagonal, `sup[i] = T[i][i+1]` (length $n-1$).
/// * `rhs` - Right-hand side (length $n$).
///
/// # Errors
/// [`InterpError::SystemSizeMismatch`] if a diagonal or the right-hand side
/// disagrees with `diag` in length,
/// [`InterpError::IllConditionedSystem`] if elimination meets a zero or
/// non-finite pivot, or the solution overflows.
pub fn solve(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Result<Vec<f64>, InterpError> {
    let n = diag.len();
    let off = n.saturating_sub(1);
    let sizes = [
        ("right-hand side", rhs.len(), n),
        ("sub-diagonal", sub.len(), off),
        ("super-diagonal", sup.len(), off),
    ];
    for (part, len, expected) in sizes {
        if len != expected {
            return Err(InterpError::SystemSizeMismatch {
                part,
                expected,
                found: len,
            });
        }
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    // Forward sweep: reduce to an upper bidiagonal system with unit diagonal.
    let mut sup_prime = vec![0.0; off];
    let mut rhs_prime = vec![0.0; n];

    let pivot = checked_pivot(diag[0], 0)?;
    if off > 0 {
        sup_prime[0] = sup[0] / pivot;
    }
    rhs_prime[0] = rhs[0] / pivot;

    for i in 1..n {
        let pivot = checked_pivot(diag[i] - sub[i - 1] * sup_prime[i - 1], i)?;
        if i < off {
            sup_prime[i] = sup[i] / pivot;
        }
        rhs_prime[i] = (rhs[i] - sub[i - 1] * rhs_prime[i - 1]) / pivot;
    }

    // Back substitution
    let mut x = rhs_prime;
    for i in (0..off).rev() {
        x[i] -= sup_prime[i] * x[i + 1];
    }

    if let Some(row) = x.iter().position(|v| !v.is_finite()) {
        return Err(InterpError::IllConditionedSystem(format!(
            "non-finite solution component at row {row}"
        )));
    }
    Ok(x)
}

fn checked_pivot(pivot: f64, row: usize) -> Result<f64, InterpError> {
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(InterpError::IllConditionedSystem(format!(
            "pivot {pivot} at row {row}"
        )));
    }
    Ok(pivot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_single_equation() {
        let x = solve(&[], &[4.0], &[], &[2.0]).unwrap();
        assert_eq!(x, vec![0.5]);
    }

    #[test]
    fn test_solve_empty_system() {
        assert!(solve(&[], &[], &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_solve_matches_residual() {
        // [ 4 1 0 0 ]
        // [ 2 5 1 0 ]
        // [ 0 1 6 2 ]
        // [ 0 0 3 7 ]
        let sub = [2.0, 1.0, 3.0];
        let diag = [4.0, 5.0, 6.0, 7.0];
        let sup = [1.0, 1.0, 2.0];
        let rhs = [1.0, -2.0, 3.0, 0.5];

        let x = solve(&sub, &diag, &sup, &rhs).unwrap();

        for i in 0..4 {
            let mut row = diag[i] * x[i];
            if i > 0 {
                row += sub[i - 1] * x[i - 1];
            }
            if i < 3 {
                row += sup[i] * x[i + 1];
            }
            assert_relative_eq!(row, rhs[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_pivot_is_ill_conditioned() {
        // [ 1 1 ]
        // [ 1 1 ] is singular; the second pivot vanishes.
        let err = solve(&[1.0], &[1.0, 1.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, InterpError::IllConditionedSystem(_)));
    }

    #[test]
    fn test_overflow_is_ill_conditioned() {
        let err = solve(&[], &[1.0], &[], &[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, InterpError::IllConditionedSystem(_)));
    }

    #[test]
    fn test_mismatched_diagonals_rejected() {
        let err = solve(&[1.0, 1.0], &[2.0, 2.0], &[1.0], &[0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            InterpError::SystemSizeMismatch {
                part: "sub-diagonal",
                expected: 1,
                found: 2,
            }
        );
        assert!(err.to_string().contains("sub-diagonal"));

        let err = solve(&[], &[2.0], &[], &[0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            InterpError::SystemSizeMismatch {
                part: "right-hand side",
                expected: 1,
                found: 2,
            }
        ));
    }
}
