//! Integration tests: built interpolants consumed as plain functions.
//!
//! Quadrature, root finding and ODE right-hand sides only ever see
//! `Fn(f64) -> f64`; a natural spline or Newton polynomial must slot in.

use approx::assert_relative_eq;

use numera_core::ode::{integrate_scalar, OdeMethod};
use numera_core::quadrature::{gauss_legendre, simpson, simpson_adaptive, AdaptiveSimpson};
use numera_core::roots::bisection;
use numera_interp::{CubicSpline, Interpolant, NewtonPolynomial};

fn reference_spline() -> CubicSpline {
    CubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 2.0, 0.0, 1.0]).unwrap()
}

/// Exact integral of a spline: sum of the cubic pieces integrated analytically.
fn exact_spline_integral(spline: &CubicSpline) -> f64 {
    let xs = spline.nodes();
    let k = spline.coefficients();
    (0..spline.intervals())
        .map(|i| {
            let h = xs[i + 1] - xs[i];
            k.a()[i] * h + k.b()[i] * h.powi(2) / 2.0 + k.c()[i] * h.powi(3) / 3.0 + k.d()[i] * h.powi(4) / 4.0
        })
        .sum()
}

#[test]
fn test_simpson_integrates_spline_exactly_on_knot_grid() {
    // Simpson is exact for cubics, and with 2 subintervals per piece every
    // Simpson panel stays inside one piece.
    let spline = reference_spline();
    let value = simpson(|x| spline.evaluate(x), 0.0, 3.0, 6).unwrap();
    assert_relative_eq!(value, exact_spline_integral(&spline), epsilon = 1e-12);
}

#[test]
fn test_adaptive_simpson_on_spline() {
    let spline = reference_spline();
    let settings = AdaptiveSimpson {
        tolerance: 1e-10,
        ..Default::default()
    };
    let est = simpson_adaptive(|x| spline.evaluate(x), 0.0, 3.0, &settings).unwrap();
    assert_relative_eq!(est.value, exact_spline_integral(&spline), epsilon = 1e-9);
}

#[test]
fn test_gauss_legendre_on_newton_polynomial() {
    // Quadratic through (0,1), (1,0), (2,3): p(x) = 2x^2 - 3x + 1, integral on [0,2] = 16/3 - 6 + 2.
    let p = NewtonPolynomial::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 3.0]).unwrap();
    let value = gauss_legendre(|x| p.value_at(x), 0.0, 2.0, 2).unwrap();
    assert_relative_eq!(value, 16.0 / 3.0 - 4.0, epsilon = 1e-12);
}

#[test]
fn test_bisection_on_spline_crossing() {
    // S(1) = 2, S(2) = 0 and S(1.5) = 1, so S - 1 changes sign on [1, 2] with root 1.5.
    let spline = reference_spline();
    let est = bisection(|x| spline.evaluate(x) - 1.0, 1.0, 1.75, 1e-10).unwrap();
    assert_relative_eq!(est.root, 1.5, epsilon = 1e-9);
}

#[test]
fn test_ode_driven_by_tabulated_rate() {
    // y' = r(x) with r a linear spline: y(2) = y(0) + integral of r.
    let rate = CubicSpline::new(vec![0.0, 2.0], vec![1.0, 3.0]).unwrap();
    let out = integrate_scalar(|x, _| rate.evaluate(x), OdeMethod::RungeKutta4, 0.0, 0.0, 0.25, 8).unwrap();
    let (x, y) = *out.last().unwrap();
    assert_relative_eq!(x, 2.0, epsilon = 1e-15);
    assert_relative_eq!(y, 4.0, epsilon = 1e-12);
}
