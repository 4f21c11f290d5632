//! Solvers that advance a state through time.
//!
//! The state can be any [`StepIntegrable`] type: a scalar, a vector, or a
//! matrix. The vector field is a plain closure `f(t, x) -> dx/dt`, so no model
//! or problem adapter is required.
//!
//! # Solvers
//!
//! - [`rk4`] — classical 4-stage Runge-Kutta, single step or fixed-step run
//!
//! [`StepIntegrable`]: zoh_core::StepIntegrable

pub mod rk4;
