//! Interpolant trait and the errors raised while building one.
//!
//! Every interpolation scheme in this crate implements [`Interpolant`], so
//! downstream consumers (quadrature, root finding, the CLI) can treat a built
//! interpolant as a plain function $f(x)$ without knowing how it was derived.

use thiserror::Error;

/// Errors from building an interpolant out of node data.
///
/// All of these are detected at construction time. Evaluating an already
/// built interpolant never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    #[error("x and y must have equal length (got {x_len} and {y_len})")]
    DimensionMismatch { x_len: usize, y_len: usize },

    #[error("At least {required} nodes are required (got {found})")]
    InsufficientPoints { required: usize, found: usize },

    #[error("x must be strictly increasing (violated at index {index})")]
    UnsortedNodes { index: usize },

    #[error("x values must be distinct (node {index} repeats an earlier abscissa)")]
    RepeatedNode { index: usize },

    #[error("Tridiagonal {part} has length {found}, expected {expected} for the system size")]
    SystemSizeMismatch {
        part: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Linear system is ill-conditioned: {0}")]
    IllConditionedSystem(String),
}

/// A one-dimensional function reconstructed from tabulated nodes.
pub trait Interpolant: Send + Sync {
    /// Human-readable name of the scheme.
    fn name(&self) -> &str;

    /// Range spanned by the nodes, `(x_first, x_last)` in sorted order.
    ///
    /// Queries outside this range are still answered; how depends on the
    /// scheme (a spline extends its boundary pieces, a polynomial simply
    /// keeps being itself).
    fn domain(&self) -> (f64, f64);

    /// Value of the interpolant at `x`.
    fn value_at(&self, x: f64) -> f64;

    /// Pointwise values for a batch of queries, in input order.
    fn values_at(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.value_at(x)).collect()
    }
}

/// Shared length checks for `(x, y)` node data.
pub(crate) fn check_lengths(x: &[f64], y: &[f64], required: usize) -> Result<(), InterpError> {
    if x.len() != y.len() {
        return Err(InterpError::DimensionMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < required {
        return Err(InterpError::InsufficientPoints {
            required,
            found: x.len(),
        });
    }
    Ok(())
}
