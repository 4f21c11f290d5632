//! Core traits shared by the zoh solvers and discretizer.
//!
//! - [`StepIntegrable`] — a state that can be advanced by `derivative * delta`
//! - [`Observer`] — receives solver events and optionally returns control actions

mod observer;
mod step;

pub use observer::Observer;
pub use step::{DerivativeOf, StepIntegrable};
