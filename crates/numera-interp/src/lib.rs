//! # Numera Interp
//!
//! One-dimensional interpolation for the Numera toolkit. All schemes
//! implement the [`Interpolant`](interpolant::Interpolant) trait, so a built
//! interpolant can stand in for any $f(x)$ elsewhere in the workspace.
//!
//! ## Available schemes
//!
//! | Scheme | Module | Build | Query |
//! |--------|--------|-------|-------|
//! | Natural cubic spline | [`spline`] | $O(n)$ | $O(\log n)$ |
//! | Lagrange polynomial | [`polynomial`] | none | $O(n^2)$ |
//! | Newton polynomial | [`polynomial`] | $O(n^2)$ | $O(n)$ |
//!
//! ## Splines
//!
//! [`spline::CubicSpline`] is built once from strictly increasing nodes and
//! then evaluated any number of times. Queries outside the node range are
//! answered by the nearest boundary cubic (see [`spline::Interval`]).
//!
//! ## Feature flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `parallel` (default) | `CubicSpline::par_evaluate_many` via Rayon |

pub mod interpolant;
pub mod polynomial;
pub mod spline;
pub mod tridiagonal;

pub use interpolant::{InterpError, Interpolant};
pub use polynomial::{LagrangePolynomial, NewtonPolynomial};
pub use spline::{CubicSpline, Interval, PieceCoefficients};
