//! Bracketing root finder.

use serde::Serialize;
use thiserror::Error;

/// Errors from root finding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootError {
    #[error("f does not change sign on [{a}, {b}] (f(a) = {fa}, f(b) = {fb})")]
    NoSignChange { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("Bracket must satisfy a < b with finite ends (got [{a}, {b}])")]
    InvalidBracket { a: f64, b: f64 },

    #[error("Tolerance must be positive and finite (got {0})")]
    InvalidTolerance(f64),
}

/// Outcome of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootEstimate {
    pub root: f64,
    /// Number of function evaluations at bracket midpoints.
    pub iterations: usize,
}

/// Find a root of `f` in `[a, b]` by repeated halving.
///
/// Requires $f(a) f(b) < 0$. The bracket is halved until its width is at
/// most `tolerance`, the midpoint hits an exact zero, or the midpoint can no
/// longer be distinguished from an endpoint in floating point. The
/// midpoint of the final bracket is returned.
pub fn bisection<F>(f: F, a: f64, b: f64, tolerance: f64) -> Result<RootEstimate, RootError>
where
    F: Fn(f64) -> f64,
{
    if !(a.is_finite() && b.is_finite() && a < b) {
        return Err(RootError::InvalidBracket { a, b });
    }
    if !(tolerance > 0.0 && tolerance.is_finite()) {
        return Err(RootError::InvalidTolerance(tolerance));
    }

    let (mut lo, mut hi) = (a, b);
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo == 0.0 {
        return Ok(RootEstimate { root: lo, iterations: 0 });
    }
    if f_hi == 0.0 {
        return Ok(RootEstimate { root: hi, iterations: 0 });
    }
    if f_lo.signum() == f_hi.signum() || f_lo.is_nan() || f_hi.is_nan() {
        return Err(RootError::NoSignChange {
            a,
            b,
            fa: f_lo,
            fb: f_hi,
        });
    }

    let mut iterations = 0;
    while hi - lo > tolerance {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }

        let f_mid = f(mid);
        iterations += 1;
        log::trace!(
            "bisection {:>3}: a={:.6} b={:.6} c={:.6} f(c)={:.6e}",
            iterations,
            lo,
            hi,
            mid,
            f_mid
        );

        if f_mid == 0.0 {
            return Ok(RootEstimate { root: mid, iterations });
        }
        if f_lo.signum() != f_mid.signum() {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    Ok(RootEstimate {
        root: 0.5 * (lo + hi),
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_sin_x_minus_1(x: f64) -> f64 {
        x * x.sin() - 1.0
    }

    #[test]
    fn test_finds_root_within_tolerance() {
        let est = bisection(x_sin_x_minus_1, 1.0, 2.0, 1e-4).unwrap();
        // Known root near 1.114157
        assert!((est.root - 1.114157).abs() < 1e-4, "root = {}", est.root);
        assert!(x_sin_x_minus_1(est.root).abs() < 1e-3);
        // 1 / 2^14 < 1e-4
        assert_eq!(est.iterations, 14);
    }

    #[test]
    fn test_cube_root_of_two() {
        let est = bisection(|x| x * x * x - 2.0, 0.0, 2.0, 1e-12).unwrap();
        assert!((est.root - 2.0_f64.cbrt()).abs() < 1e-12);
    }

    #[test]
    fn test_exact_zero_at_midpoint() {
        let est = bisection(|x| x - 1.0, 0.0, 2.0, 1e-9).unwrap();
        assert_eq!(est.root, 1.0);
        assert_eq!(est.iterations, 1);
    }

    #[test]
    fn test_tiny_tolerance_terminates() {
        let est = bisection(|x| x - 0.1, 0.0, 1.0, 1e-300).unwrap();
        assert!((est.root - 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_rejects_missing_sign_change() {
        let err = bisection(|x| x * x + 1.0, -1.0, 1.0, 1e-6).unwrap_err();
        assert!(matches!(err, RootError::NoSignChange { .. }));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert_eq!(
            bisection(|x| x, 1.0, -1.0, 1e-6).unwrap_err(),
            RootError::InvalidBracket { a: 1.0, b: -1.0 }
        );
        assert_eq!(
            bisection(|x| x, -1.0, 1.0, -1.0).unwrap_err(),
            RootError::InvalidTolerance(-1.0)
        );
    }
}
