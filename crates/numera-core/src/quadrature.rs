//! Definite integrals of scalar functions.
//!
//! Composite Newton-Cotes rules (trapezoid, Simpson) on uniform grids, an
//! adaptive Simpson driver that doubles the grid until successive estimates
//! agree, and Gauss-Legendre rules of arbitrary order.
//!
//! All rules accept reversed bounds ($b < a$) and return the negated
//! integral, matching $\int_a^b = -\int_b^a$.

use serde::Serialize;
use thiserror::Error;

/// Errors from quadrature rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadratureError {
    #[error("Number of subintervals must be positive (got {0})")]
    InvalidSubintervals(usize),

    #[error("Gauss-Legendre order must be positive (got {0})")]
    InvalidOrder(usize),

    #[error("Integration bounds must be finite (got [{a}, {b}])")]
    NonFiniteBounds { a: f64, b: f64 },

    #[error("Tolerance must be positive and finite (got {0})")]
    InvalidTolerance(f64),

    #[error(
        "Adaptive Simpson did not converge after {max_iterations} refinements \
         (last estimate {estimate:.10}, change {change:.2e})"
    )]
    NotConverged {
        max_iterations: usize,
        estimate: f64,
        change: f64,
    },
}

fn check_bounds(a: f64, b: f64) -> Result<(), QuadratureError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(QuadratureError::NonFiniteBounds { a, b });
    }
    Ok(())
}

/// Composite trapezoid rule on `n` equal subintervals.
pub fn trapezoid<F>(f: F, a: f64, b: f64, n: usize) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_bounds(a, b)?;
    if n == 0 {
        return Err(QuadratureError::InvalidSubintervals(n));
    }

    let h = (b - a) / n as f64;
    let interior: f64 = (1..n).map(|i| f(a + i as f64 * h)).sum();
    Ok(h * (0.5 * (f(a) + f(b)) + interior))
}

/// Composite Simpson rule.
///
/// Simpson needs an even number of subintervals; an odd `n` is rounded up.
pub fn simpson<F>(f: F, a: f64, b: f64, n: usize) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_bounds(a, b)?;
    if n == 0 {
        return Err(QuadratureError::InvalidSubintervals(n));
    }
    Ok(simpson_sum(&f, a, b, even(n)))
}

fn even(n: usize) -> usize {
    n + n % 2
}

fn simpson_sum<F>(f: &F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}

/// Settings for [`simpson_adaptive`].
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveSimpson {
    /// Starting number of subintervals (rounded up to even).
    pub initial_subintervals: usize,
    /// Stop once two successive estimates differ by less than this.
    pub tolerance: f64,
    /// Maximum number of grid doublings.
    pub max_iterations: usize,
}

impl Default for AdaptiveSimpson {
    fn default() -> Self {
        Self {
            initial_subintervals: 2,
            tolerance: 1e-6,
            max_iterations: 20,
        }
    }
}

/// Result of an adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdaptiveEstimate {
    pub value: f64,
    /// Subintervals used by the accepted estimate.
    pub subintervals: usize,
}

/// Simpson's rule with automatic step selection.
///
/// Starting from `initial_subintervals`, the grid is doubled until
/// $|S_n - S_{n/2}| <$ `tolerance`.
pub fn simpson_adaptive<F>(
    f: F,
    a: f64,
    b: f64,
    settings: &AdaptiveSimpson,
) -> Result<AdaptiveEstimate, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_bounds(a, b)?;
    if settings.initial_subintervals == 0 {
        return Err(QuadratureError::InvalidSubintervals(0));
    }
    if !(settings.tolerance > 0.0 && settings.tolerance.is_finite()) {
        return Err(QuadratureError::InvalidTolerance(settings.tolerance));
    }

    let mut n = even(settings.initial_subintervals);
    let mut previous = f64::INFINITY;
    let mut change = f64::INFINITY;

    for _ in 0..settings.max_iterations {
        let estimate = simpson_sum(&f, a, b, n);
        change = (estimate - previous).abs();
        log::debug!("simpson n={}: estimate={:.12}, change={:.3e}", n, estimate, change);

        if change < settings.tolerance {
            return Ok(AdaptiveEstimate {
                value: estimate,
                subintervals: n,
            });
        }
        previous = estimate;
        n = match refine(n) {
            Some(next) => next,
            None => {
                log::debug!("simpson grid cannot be refined past n={}", n);
                break;
            }
        };
    }

    Err(QuadratureError::NotConverged {
        max_iterations: settings.max_iterations,
        estimate: previous,
        change,
    })
}

/// Next grid size for adaptive Simpson, `None` once doubling would overflow.
fn refine(n: usize) -> Option<usize> {
    n.checked_mul(2)
}

/// Map nodes and weights on $[-1, 1]$ to $[a, b]$ and sum.
fn gauss_sum<F>(f: &F, a: f64, b: f64, nodes: &[f64], weights: &[f64]) -> f64
where
    F: Fn(f64) -> f64,
{
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    let sum: f64 = nodes
        .iter()
        .zip(weights)
        .map(|(&t, &w)| w * f(half * t + mid))
        .sum();
    half * sum
}

/// Two-point Gauss-Legendre rule (exact for cubics).
pub fn gauss2<F>(f: F, a: f64, b: f64) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_bounds(a, b)?;
    let t = 1.0 / 3.0_f64.sqrt();
    Ok(gauss_sum(&f, a, b, &[-t, t], &[1.0, 1.0]))
}

/// Three-point Gauss-Legendre rule (exact for quintics).
pub fn gauss3<F>(f: F, a: f64, b: f64) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_bounds(a, b)?;
    let t = (3.0_f64 / 5.0).sqrt();
    Ok(gauss_sum(&f, a, b, &[-t, 0.0, t], &[5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0]))
}

/// `n`-point Gauss-Legendre rule (exact for polynomials of degree $2n - 1$).
pub fn gauss_legendre<F>(f: F, a: f64, b: f64, n: usize) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    check_bounds(a, b)?;
    let (nodes, weights) = legendre_nodes(n)?;
    Ok(gauss_sum(&f, a, b, &nodes, &weights))
}

/// Gauss-Legendre nodes (ascending) and weights on $[-1, 1]$.
///
/// Nodes are the roots of $P_n$, found by Newton iteration from the
/// Chebyshev-like guess $\cos(\pi (i + 3/4) / (n + 1/2))$; weights are
/// $2 / ((1 - x^2) P_n'(x)^2)$.
pub fn legendre_nodes(n: usize) -> Result<(Vec<f64>, Vec<f64>), QuadratureError> {
    if n == 0 {
        return Err(QuadratureError::InvalidOrder(n));
    }

    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];

    // Roots are symmetric about zero; find the positive half.
    for i in 0..n.div_ceil(2) {
        let mut z = ((i as f64 + 0.75) / (n as f64 + 0.5) * std::f64::consts::PI).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_p_and_dp(n, z);
            let step = p / dp;
            z -= step;
            if step.abs() < 1e-15 {
                break;
            }
        }

        let (_, dp) = legendre_p_and_dp(n, z);
        let w = 2.0 / ((1.0 - z * z) * dp * dp);

        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    Ok((nodes, weights))
}

/// $P_n(x)$ and $P_n'(x)$ by the three-term recurrence. Requires $|x| < 1$.
fn legendre_p_and_dp(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 2..=n {
        let p_next = ((2 * k - 1) as f64 * x * p_curr - (k - 1) as f64 * p_prev) / k as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }
    if n == 0 {
        return (1.0, 0.0);
    }
    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}
