//! # Numera Core
//!
//! Classical single-pass numerical procedures for the Numera toolkit. Every
//! routine is a pure function of its inputs: callers pass closures for the
//! integrand, right-hand side or target function and get plain values back.
//!
//! ## Modules
//!
//! - [`quadrature`]: Trapezoid, Simpson (fixed and adaptive), Gauss-Legendre.
//! - [`ode`]: Euler, Euler-Heun and RK4 integrators for scalar ODEs and
//!   coupled systems.
//! - [`roots`]: Bisection root finder.
//!
//! Interpolated data from `numera-interp` plugs in anywhere an `Fn(f64) -> f64`
//! is expected, e.g. integrating a spline with `|x| spline.evaluate(x)`.

pub mod ode;
pub mod quadrature;
pub mod roots;

pub use ode::{OdeError, OdeMethod, Trajectory};
pub use quadrature::{AdaptiveEstimate, AdaptiveSimpson, QuadratureError};
pub use roots::{RootError, RootEstimate};
