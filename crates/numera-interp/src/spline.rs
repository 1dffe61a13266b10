//! Natural cubic spline interpolation.
//!
//! Given nodes $(x_i, y_i)$, $i = 0..n$, with strictly increasing $x_i$, the
//! spline is a piecewise cubic
//!
//! $$S_i(t) = a_i + b_i t + c_i t^2 + d_i t^3, \quad t = x - x_i,$$
//!
//! on each interval $[x_i, x_{i+1}]$, with continuous first and second
//! derivatives at the interior knots and $S''(x_0) = S''(x_n) = 0$.
//!
//! Construction solves a symmetric tridiagonal system for the interior
//! second derivatives $M_1..M_{n-1}$ once; evaluation afterwards is a binary
//! search plus one cubic, so a built [`CubicSpline`] can be queried any
//! number of times (and from any number of threads).

use std::cmp::Ordering;

use serde::Serialize;

use crate::interpolant::{check_lengths, InterpError, Interpolant};
use crate::tridiagonal;

/// Where a query falls relative to the knots.
///
/// The boundary pieces are extended past the data range: `Below` evaluates
/// interval 0 at a negative offset, `Above` evaluates interval $n-1$ past its
/// right endpoint. No special linear continuation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    /// Query lies left of $x_0$.
    Below,
    /// Query lies in $[x_i, x_{i+1}]$. A query equal to an interior knot
    /// belongs to the interval that starts there.
    Interior(usize),
    /// Query lies right of $x_n$.
    Above,
}

/// Polynomial coefficients of every piece, one entry per interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceCoefficients {
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl PieceCoefficients {
    /// Constant terms, $a_i = y_i$.
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Linear terms, $b_i = S'(x_i)$.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Quadratic terms, $c_i = M_i / 2$.
    pub fn c(&self) -> &[f64] {
        &self.c
    }

    /// Cubic terms, $d_i = (M_{i+1} - M_i) / 6h_i$.
    pub fn d(&self) -> &[f64] {
        &self.d
    }

    fn len(&self) -> usize {
        self.a.len()
    }
}

/// A natural cubic spline built from node data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubicSpline {
    /// Strictly increasing knots.
    xs: Vec<f64>,
    ys: Vec<f64>,
    coefficients: PieceCoefficients,
}

impl CubicSpline {
    /// Construct a natural cubic spline from data points.
    ///
    /// # Arguments
    /// * `xs` - Strictly increasing x values.
    /// * `ys` - Corresponding y values (same length as `xs`).
    ///
    /// With exactly two nodes the result is the straight line through them.
    ///
    /// # Errors
    /// * [`InterpError::DimensionMismatch`] if the lengths differ.
    /// * [`InterpError::InsufficientPoints`] for fewer than two nodes.
    /// * [`InterpError::UnsortedNodes`] if `xs` is not strictly increasing
    ///   (repeated or NaN abscissas included).
    /// * [`InterpError::IllConditionedSystem`] if the tridiagonal solve
    ///   breaks down, e.g. because of overflowing data.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpError> {
        check_lengths(&xs, &ys, 2)?;
        // Must run before any division by h_i.
        for i in 1..xs.len() {
            if xs[i].partial_cmp(&xs[i - 1]) != Some(Ordering::Greater) {
                return Err(InterpError::UnsortedNodes { index: i });
            }
        }

        let n = xs.len() - 1;
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        let coefficients = if n == 1 {
            log::debug!("two nodes: building linear spline");
            PieceCoefficients {
                a: vec![ys[0]],
                b: vec![(ys[1] - ys[0]) / h[0]],
                c: vec![0.0],
                d: vec![0.0],
            }
        } else {
            let m = natural_second_derivatives(&ys, &h)?;
            log::debug!("built natural spline over {} intervals", n);
            derive_coefficients(&ys, &h, &m)
        };

        Ok(Self { xs, ys, coefficients })
    }

    /// The knots $x_0 < x_1 < \dots < x_n$.
    pub fn nodes(&self) -> &[f64] {
        &self.xs
    }

    /// The data values $y_i$ at each knot.
    pub fn values(&self) -> &[f64] {
        &self.ys
    }

    /// Coefficients of every cubic piece.
    pub fn coefficients(&self) -> &PieceCoefficients {
        &self.coefficients
    }

    /// Number of cubic pieces, $n = |\text{nodes}| - 1$.
    pub fn intervals(&self) -> usize {
        self.coefficients.len()
    }

    /// Resolve which piece governs the query `x`.
    pub fn locate(&self, x: f64) -> Interval {
        let n = self.intervals();
        if x < self.xs[0] {
            Interval::Below
        } else if x > self.xs[n] {
            Interval::Above
        } else {
            // Insertion point after any equal knot, minus one.
            let i = self.xs.partition_point(|&knot| knot <= x).saturating_sub(1);
            Interval::Interior(i.min(n - 1))
        }
    }

    fn piece(&self, x: f64) -> usize {
        match self.locate(x) {
            Interval::Below => 0,
            Interval::Above => self.intervals() - 1,
            Interval::Interior(i) => i,
        }
    }

    /// Evaluate the spline at a given x value.
    ///
    /// Extrapolation beyond the data range uses the boundary polynomial.
    /// Non-finite queries give non-finite results.
    ///
    /// A two-node spline evaluates the straight line
    /// $y_0 + (x - x_0)/(x_1 - x_0) \cdot (y_1 - y_0)$ in exactly that order.
    pub fn evaluate(&self, x: f64) -> f64 {
        if let (&[x0, x1], &[y0, y1]) = (self.xs.as_slice(), self.ys.as_slice()) {
            return y0 + (x - x0) / (x1 - x0) * (y1 - y0);
        }
        let i = self.piece(x);
        let t = x - self.xs[i];
        let k = &self.coefficients;
        k.a[i] + t * (k.b[i] + t * (k.c[i] + t * k.d[i]))
    }

    /// Evaluate a batch of queries, preserving order.
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Evaluate a batch of queries across the Rayon thread pool.
    ///
    /// Results are identical to [`CubicSpline::evaluate_many`].
    #[cfg(feature = "parallel")]
    pub fn par_evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        use rayon::prelude::*;

        xs.par_iter().map(|&x| self.evaluate(x)).collect()
    }

    /// First derivative $S'(x)$, using the same interval policy as
    /// [`CubicSpline::evaluate`].
    pub fn derivative(&self, x: f64) -> f64 {
        let i = self.piece(x);
        let t = x - self.xs[i];
        let k = &self.coefficients;
        k.b[i] + t * (2.0 * k.c[i] + 3.0 * k.d[i] * t)
    }

    /// Second derivative $S''(x)$.
    pub fn second_derivative(&self, x: f64) -> f64 {
        let i = self.piece(x);
        let t = x - self.xs[i];
        let k = &self.coefficients;
        2.0 * k.c[i] + 6.0 * k.d[i] * t
    }
}

impl Interpolant for CubicSpline {
    fn name(&self) -> &str {
        "natural cubic spline"
    }

    fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    fn value_at(&self, x: f64) -> f64 {
        self.evaluate(x)
    }

    fn values_at(&self, xs: &[f64]) -> Vec<f64> {
        self.evaluate_many(xs)
    }
}

/// Build a spline through `(x, y)` and evaluate it at every query in one go.
pub fn interpolate(x: &[f64], y: &[f64], queries: &[f64]) -> Result<Vec<f64>, InterpError> {
    let spline = CubicSpline::new(x.to_vec(), y.to_vec())?;
    Ok(spline.evaluate_many(queries))
}

/// Second derivatives $M_0..M_n$ with $M_0 = M_n = 0$. Requires $n \geq 2$.
///
/// Row $i-1$ of the system for unknown $M_i$:
/// $h_{i-1} M_{i-1} + 2(h_{i-1} + h_i) M_i + h_i M_{i+1}
///  = 6[(y_{i+1} - y_i)/h_i - (y_i - y_{i-1})/h_{i-1}]$.
fn natural_second_derivatives(ys: &[f64], h: &[f64]) -> Result<Vec<f64>, InterpError> {
    let n = h.len();
    let unknowns = n - 1;

    let mut diag = Vec::with_capacity(unknowns);
    let mut rhs = Vec::with_capacity(unknowns);
    for i in 1..n {
        diag.push(2.0 * (h[i - 1] + h[i]));
        rhs.push(6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]));
    }
    // Symmetric: row i couples to M_{i+1} with h_i, row i+1 to M_i with h_i.
    let off = &h[1..n - 1];

    let interior = tridiagonal::solve(off, &diag, off, &rhs)?;

    let mut m = Vec::with_capacity(n + 1);
    m.push(0.0);
    m.extend(interior);
    m.push(0.0);
    Ok(m)
}

fn derive_coefficients(ys: &[f64], h: &[f64], m: &[f64]) -> PieceCoefficients {
    let n = h.len();
    let mut b = Vec::with_capacity(n);
    let mut c = Vec::with_capacity(n);
    let mut d = Vec::with_capacity(n);

    for i in 0..n {
        b.push((ys[i + 1] - ys[i]) / h[i] - h[i] * (m[i + 1] + 2.0 * m[i]) / 6.0);
        c.push(m[i] / 2.0);
        d.push((m[i + 1] - m[i]) / (6.0 * h[i]));
    }

    PieceCoefficients {
        a: ys[..n].to_vec(),
        b,
        c,
        d,
    }
}
