//! Built-in functions and ODE systems that job files can refer to by name.

/// A named scalar function $f(x)$.
pub struct ScalarFunction {
    pub name: &'static str,
    pub formula: &'static str,
    pub eval: fn(f64) -> f64,
}

/// A named right-hand side $\mathbf{y}' = \mathbf{f}(x, \mathbf{y})$.
pub struct OdeSystem {
    pub name: &'static str,
    pub formula: &'static str,
    pub dimension: usize,
    pub rhs: fn(f64, &[f64], &mut [f64]),
    /// Closed-form solution through `(x0, y0)`, evaluated at `x`.
    pub exact: Option<fn(f64, &[f64], f64) -> Vec<f64>>,
}

pub const INTEGRANDS: &[ScalarFunction] = &[
    ScalarFunction {
        name: "sin",
        formula: "sin(x)",
        eval: f64::sin,
    },
    ScalarFunction {
        name: "cos",
        formula: "cos(x)",
        eval: f64::cos,
    },
    ScalarFunction {
        name: "exp",
        formula: "e^x",
        eval: f64::exp,
    },
    ScalarFunction {
        name: "cubic",
        formula: "4x^3",
        eval: |x| 4.0 * x * x * x,
    },
    ScalarFunction {
        name: "gaussian",
        formula: "e^(-x^2)",
        eval: |x| (-x * x).exp(),
    },
];

pub const ROOT_FUNCTIONS: &[ScalarFunction] = &[
    ScalarFunction {
        name: "x_sin_x_minus_1",
        formula: "x sin(x) - 1",
        eval: |x| x * x.sin() - 1.0,
    },
    ScalarFunction {
        name: "cubic_minus_two",
        formula: "x^3 - 2",
        eval: |x| x * x * x - 2.0,
    },
];

pub const ODE_SYSTEMS: &[OdeSystem] = &[
    OdeSystem {
        name: "linear_quadratic",
        formula: "y' = y - x^2 + 1",
        dimension: 1,
        rhs: |x, y, dydx| dydx[0] = y[0] - x * x + 1.0,
        exact: Some(linear_quadratic_exact),
    },
    OdeSystem {
        name: "decay",
        formula: "y' = -y",
        dimension: 1,
        rhs: |_, y, dydx| dydx[0] = -y[0],
        exact: Some(decay_exact),
    },
    OdeSystem {
        name: "harmonic",
        formula: "y1' = y2, y2' = -y1",
        dimension: 2,
        rhs: |_, y, dydx| {
            dydx[0] = y[1];
            dydx[1] = -y[0];
        },
        exact: Some(harmonic_exact),
    },
    OdeSystem {
        name: "coupled_linear",
        formula: "y1' = y1 + y2, y2' = y1 - y2",
        dimension: 2,
        rhs: |_, y, dydx| {
            dydx[0] = y[0] + y[1];
            dydx[1] = y[0] - y[1];
        },
        exact: None,
    },
];

fn linear_quadratic_exact(x0: f64, y0: &[f64], x: f64) -> Vec<f64> {
    // y = (x + 1)^2 + C e^x
    let c = (y0[0] - (x0 + 1.0).powi(2)) * (-x0).exp();
    vec![(x + 1.0).powi(2) + c * x.exp()]
}

fn decay_exact(x0: f64, y0: &[f64], x: f64) -> Vec<f64> {
    vec![y0[0] * (x0 - x).exp()]
}

fn harmonic_exact(x0: f64, y0: &[f64], x: f64) -> Vec<f64> {
    let (s, c) = (x - x0).sin_cos();
    vec![y0[0] * c + y0[1] * s, -y0[0] * s + y0[1] * c]
}

/// Look up a scalar function among integrands and root functions.
pub fn scalar_function(name: &str) -> Option<&'static ScalarFunction> {
    INTEGRANDS
        .iter()
        .chain(ROOT_FUNCTIONS.iter())
        .find(|f| f.name == name)
}

pub fn ode_system(name: &str) -> Option<&'static OdeSystem> {
    ODE_SYSTEMS.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup() {
        assert!(scalar_function("sin").is_some());
        assert!(scalar_function("x_sin_x_minus_1").is_some());
        assert!(scalar_function("tan").is_none());
        assert_eq!(ode_system("harmonic").unwrap().dimension, 2);
    }

    #[test]
    fn test_exact_solutions_satisfy_initial_condition() {
        for system in ODE_SYSTEMS {
            let Some(exact) = system.exact else { continue };
            let y0: Vec<f64> = (0..system.dimension).map(|i| 0.5 + i as f64).collect();
            let at_start = exact(0.3, &y0, 0.3);
            for (a, b) in at_start.iter().zip(&y0) {
                assert_relative_eq!(*a, *b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_linear_quadratic_exact_matches_textbook() {
        // y(0) = 0.5 gives y = (x + 1)^2 - e^x / 2
        let exact = ode_system("linear_quadratic").unwrap().exact.unwrap();
        let y = exact(0.0, &[0.5], 2.0)[0];
        assert_relative_eq!(y, 9.0 - 0.5 * 2.0_f64.exp(), epsilon = 1e-12);
    }
}
