//! Global polynomial interpolation through all nodes.
//!
//! Both forms represent the same unique polynomial of degree $\leq n-1$
//! through $n$ distinct nodes; they differ only in how it is evaluated.
//!
//! - [`LagrangePolynomial`] evaluates the Lagrange basis directly,
//!   $O(n^2)$ per query, no precomputation.
//! - [`NewtonPolynomial`] precomputes divided differences once, $O(n^2)$,
//!   then evaluates in nested form, $O(n)$ per query.
//!
//! Abscissas may be given in any order but must be pairwise distinct.

use crate::interpolant::{check_lengths, InterpError, Interpolant};

fn check_distinct(xs: &[f64]) -> Result<(), InterpError> {
    for j in 1..xs.len() {
        if xs[..j].iter().any(|&x| x == xs[j]) {
            return Err(InterpError::RepeatedNode { index: j });
        }
    }
    Ok(())
}

fn span(xs: &[f64]) -> (f64, f64) {
    xs.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}

/// Interpolating polynomial in Lagrange form.
#[derive(Debug, Clone)]
pub struct LagrangePolynomial {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LagrangePolynomial {
    /// # Errors
    /// [`InterpError::DimensionMismatch`], [`InterpError::InsufficientPoints`]
    /// (no nodes at all) or [`InterpError::RepeatedNode`].
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpError> {
        check_lengths(&xs, &ys, 1)?;
        check_distinct(&xs)?;
        Ok(Self { xs, ys })
    }

    /// $L(x) = \sum_i y_i \prod_{j \neq i} (x - x_j)/(x_i - x_j)$.
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut result = 0.0;
        for (i, (&xi, &yi)) in self.xs.iter().zip(&self.ys).enumerate() {
            let mut term = yi;
            for (j, &xj) in self.xs.iter().enumerate() {
                if i != j {
                    term *= (x - xj) / (xi - xj);
                }
            }
            result += term;
        }
        result
    }
}

impl Interpolant for LagrangePolynomial {
    fn name(&self) -> &str {
        "Lagrange polynomial"
    }

    fn domain(&self) -> (f64, f64) {
        span(&self.xs)
    }

    fn value_at(&self, x: f64) -> f64 {
        self.evaluate(x)
    }
}

/// Interpolating polynomial in Newton (divided-difference) form.
#[derive(Debug, Clone)]
pub struct NewtonPolynomial {
    xs: Vec<f64>,
    /// Top row of the divided-difference table, $f[x_0, \dots, x_k]$.
    coefficients: Vec<f64>,
}

impl NewtonPolynomial {
    /// Build the divided-difference table.
    ///
    /// # Errors
    /// Same as [`LagrangePolynomial::new`].
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpError> {
        check_lengths(&xs, &ys, 1)?;
        check_distinct(&xs)?;

        // In-place column sweep: after pass k, table[i] = f[x_{i-k}, ..., x_i]
        // for i >= k, and table[k] is the k-th Newton coefficient.
        let n = xs.len();
        let mut table = ys;
        for k in 1..n {
            for i in (k..n).rev() {
                table[i] = (table[i] - table[i - 1]) / (xs[i] - xs[i - k]);
            }
        }

        Ok(Self {
            xs,
            coefficients: table,
        })
    }

    /// Newton coefficients $f[x_0], f[x_0, x_1], \dots$.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Nested evaluation of
    /// $f[x_0] + f[x_0,x_1](x - x_0) + \dots + f[x_0..x_{n-1}]\prod_{k<n-1}(x - x_k)$.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.coefficients.len();
        let mut result = self.coefficients[n - 1];
        for k in (0..n - 1).rev() {
            result = result * (x - self.xs[k]) + self.coefficients[k];
        }
        result
    }
}

impl Interpolant for NewtonPolynomial {
    fn name(&self) -> &str {
        "Newton polynomial"
    }

    fn domain(&self) -> (f64, f64) {
        span(&self.xs)
    }

    fn value_at(&self, x: f64) -> f64 {
        self.evaluate(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const X: [f64; 5] = [0.27, 0.93, 1.46, 2.11, 2.87];
    const Y: [f64; 5] = [2.60, 2.43, 2.06, 0.25, -2.60];

    #[test]
    fn test_lagrange_reproduces_nodes() {
        let p = LagrangePolynomial::new(X.to_vec(), Y.to_vec()).unwrap();
        for (&x, &y) in X.iter().zip(&Y) {
            assert_relative_eq!(p.evaluate(x), y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_newton_agrees_with_lagrange() {
        let lagrange = LagrangePolynomial::new(X.to_vec(), Y.to_vec()).unwrap();
        let newton = NewtonPolynomial::new(X.to_vec(), Y.to_vec()).unwrap();
        for &q in &[1.02, 0.65, 1.28, 0.0, 3.0] {
            assert_relative_eq!(newton.evaluate(q), lagrange.evaluate(q), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_newton_exact_for_quadratic() {
        // f(x) = 3x^2 - 2x + 1 has f[x0] = 1, f[x0,x1] = 1, f[x0,x1,x2] = 3 at 0, 1, 2.
        let xs = vec![0.0, 1.0, 2.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x * x - 2.0 * x + 1.0).collect();
        let p = NewtonPolynomial::new(xs, ys).unwrap();
        assert_eq!(p.coefficients(), &[1.0, 1.0, 3.0]);
        assert_relative_eq!(p.evaluate(5.0), 66.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unsorted_nodes_are_fine() {
        let p = NewtonPolynomial::new(vec![2.0, 0.0, 1.0], vec![4.0, 0.0, 1.0]).unwrap();
        assert_relative_eq!(p.evaluate(3.0), 9.0, epsilon = 1e-12);
        assert_eq!(p.domain(), (0.0, 2.0));
    }

    #[test]
    fn test_single_node_is_constant() {
        let p = LagrangePolynomial::new(vec![1.0], vec![7.0]).unwrap();
        assert_eq!(p.evaluate(-100.0), 7.0);
        let q = NewtonPolynomial::new(vec![1.0], vec![7.0]).unwrap();
        assert_eq!(q.evaluate(100.0), 7.0);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            LagrangePolynomial::new(vec![], vec![]).unwrap_err(),
            InterpError::InsufficientPoints { required: 1, found: 0 }
        );
        assert_eq!(
            NewtonPolynomial::new(vec![1.0, 2.0, 1.0], vec![0.0; 3]).unwrap_err(),
            InterpError::RepeatedNode { index: 2 }
        );
        assert!(matches!(
            NewtonPolynomial::new(vec![1.0, 2.0], vec![0.0]).unwrap_err(),
            InterpError::DimensionMismatch { .. }
        ));
    }
}
