//! Fixed-step explicit integrators for initial value problems.
//!
//! Solves $\mathbf{y}' = \mathbf{f}(x, \mathbf{y})$, $\mathbf{y}(x_0) = \mathbf{y}_0$
//! on a uniform grid $x_k = x_0 + k h$ with one of three one-step methods:
//!
//! | Method | Order | Stages |
//! |--------|-------|--------|
//! | [`OdeMethod::Euler`] | 1 | 1 |
//! | [`OdeMethod::Heun`] (Euler-Cauchy) | 2 | 2 |
//! | [`OdeMethod::RungeKutta4`] | 4 | 4 |
//!
//! Systems of any dimension are supported; the right-hand side writes
//! $d\mathbf{y}/dx$ into a caller-provided slice so no allocation happens
//! per stage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the ODE integrators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OdeError {
    #[error("Step size must be non-zero and finite (got {0})")]
    InvalidStepSize(f64),

    #[error("Initial state must have at least one component")]
    EmptyState,
}

/// One-step integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdeMethod {
    /// Forward Euler, $y_{k+1} = y_k + h f(x_k, y_k)$.
    Euler,
    /// Euler predictor followed by a trapezoidal corrector.
    Heun,
    /// Classical fourth-order Runge-Kutta.
    #[serde(rename = "rk4")]
    RungeKutta4,
}

impl OdeMethod {
    /// Human-readable name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            OdeMethod::Euler => "Euler",
            OdeMethod::Heun => "Euler-Heun",
            OdeMethod::RungeKutta4 => "Runge-Kutta 4",
        }
    }

    /// Global order of accuracy.
    pub fn order(&self) -> u32 {
        match self {
            OdeMethod::Euler => 1,
            OdeMethod::Heun => 2,
            OdeMethod::RungeKutta4 => 4,
        }
    }
}

/// Sampled solution: `xs[k]` and the state `ys[k]` at that abscissa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub xs: Vec<f64>,
    pub ys: Vec<Vec<f64>>,
}

impl Trajectory {
    /// Number of samples (steps + 1).
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Final `(x, y)` sample.
    pub fn last(&self) -> Option<(f64, &[f64])> {
        let x = *self.xs.last()?;
        let y = self.ys.last()?;
        Some((x, y.as_slice()))
    }

    /// Time series of component `k`, or `None` if the state has fewer
    /// than `k + 1` components.
    pub fn component(&self, k: usize) -> Option<Vec<f64>> {
        self.ys.iter().map(|y| y.get(k).copied()).collect()
    }
}

/// Integrate a system of ODEs.
///
/// # Arguments
/// * `f` - Right-hand side; `f(x, y, dydx)` must fill `dydx`.
/// * `method` - Integration scheme.
/// * `x0`, `y0` - Initial condition.
/// * `h` - Step size (negative integrates backwards).
/// * `steps` - Number of steps; the trajectory has `steps + 1` samples.
pub fn integrate_system<F>(
    f: F,
    method: OdeMethod,
    x0: f64,
    y0: &[f64],
    h: f64,
    steps: usize,
) -> Result<Trajectory, OdeError>
where
    F: Fn(f64, &[f64], &mut [f64]),
{
    if h == 0.0 || !h.is_finite() {
        return Err(OdeError::InvalidStepSize(h));
    }
    if y0.is_empty() {
        return Err(OdeError::EmptyState);
    }

    log::debug!(
        "{}: {} equations, x0={}, h={}, {} steps",
        method.name(),
        y0.len(),
        x0,
        h,
        steps
    );

    let mut stepper = Stepper::new(y0.len());
    let mut xs = Vec::with_capacity(steps + 1);
    let mut ys = Vec::with_capacity(steps + 1);

    let mut y = y0.to_vec();
    xs.push(x0);
    ys.push(y.clone());

    for k in 0..steps {
        let x = x0 + k as f64 * h;
        stepper.step(&f, method, x, &mut y, h);
        xs.push(x0 + (k + 1) as f64 * h);
        ys.push(y.clone());
    }

    Ok(Trajectory { xs, ys })
}

/// Integrate a single scalar ODE $y' = f(x, y)$.
///
/// Returns `(x_k, y_k)` pairs, initial condition included.
pub fn integrate_scalar<F>(
    f: F,
    method: OdeMethod,
    x0: f64,
    y0: f64,
    h: f64,
    steps: usize,
) -> Result<Vec<(f64, f64)>, OdeError>
where
    F: Fn(f64, f64) -> f64,
{
    let trajectory = integrate_system(|x, y, dydx| dydx[0] = f(x, y[0]), method, x0, &[y0], h, steps)?;
    Ok(trajectory
        .xs
        .into_iter()
        .zip(trajectory.ys)
        .map(|(x, y)| (x, y[0]))
        .collect())
}

/// Stage buffers reused across steps.
struct Stepper {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    tmp: Vec<f64>,
}

impl Stepper {
    fn new(dim: usize) -> Self {
        Self {
            k1: vec![0.0; dim],
            k2: vec![0.0; dim],
            k3: vec![0.0; dim],
            k4: vec![0.0; dim],
            tmp: vec![0.0; dim],
        }
    }

    fn step<F>(&mut self, f: &F, method: OdeMethod, x: f64, y: &mut [f64], h: f64)
    where
        F: Fn(f64, &[f64], &mut [f64]),
    {
        match method {
            OdeMethod::Euler => {
                f(x, y, &mut self.k1);
                for (yi, k1) in y.iter_mut().zip(&self.k1) {
                    *yi += h * k1;
                }
            }
            OdeMethod::Heun => {
                f(x, y, &mut self.k1);
                for i in 0..y.len() {
                    self.tmp[i] = y[i] + h * self.k1[i];
                }
                f(x + h, &self.tmp, &mut self.k2);
                for i in 0..y.len() {
                    y[i] += 0.5 * h * (self.k1[i] + self.k2[i]);
                }
            }
            OdeMethod::RungeKutta4 => {
                let half = 0.5 * h;

                f(x, y, &mut self.k1);
                for i in 0..y.len() {
                    self.tmp[i] = y[i] + half * self.k1[i];
                }
                f(x + half, &self.tmp, &mut self.k2);
                for i in 0..y.len() {
                    self.tmp[i] = y[i] + half * self.k2[i];
                }
                f(x + half, &self.tmp, &mut self.k3);
                for i in 0..y.len() {
                    self.tmp[i] = y[i] + h * self.k3[i];
                }
                f(x + h, &self.tmp, &mut self.k4);

                for i in 0..y.len() {
                    y[i] += h / 6.0
                        * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
                }
            }
        }
    }
}
