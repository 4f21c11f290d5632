//! Numerical solvers for ODE initial-value problems.
//!
//! - [`transient::rk4`] — classical fixed-step 4th-order Runge-Kutta over a
//!   vector field `f(t, x)` that may depend explicitly on time

pub mod transient;
