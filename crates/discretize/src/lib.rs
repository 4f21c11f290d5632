//! Zero-order-hold discretization of continuous-time linear models.
//!
//! Converts `dx/dt = A x + B u` with continuous process noise intensity `Q`
//! and measurement noise intensity `R` into the discrete recurrence
//! `x[k+1] = A_d x[k] + B_d u[k]` with covariances `Q_d` and `R_d`, for a
//! fixed sample period `dt`.
//!
//! - [`discretize_a`] — `A_d = e^(A·dt)`
//! - [`discretize_ab`] — `A_d` and `B_d` from one augmented exponential
//! - [`discretize_aq`] — `A_d` and `Q_d` by Van Loan's method
//! - [`discretize_r`] — `R_d = R / dt`
//! - [`discretize_system`] — all of the above into a [`DiscreteSystem`]
//!
//! Every operation is a pure function: it borrows its operands, keeps no
//! state, and returns either a complete result or an [`Error`].
//!
//! # Example
//!
//! ```
//! use nalgebra::{dmatrix, dvector};
//! use zoh_discretize::discretize_ab;
//!
//! // Double integrator: position and velocity driven by acceleration.
//! let a = dmatrix![0.0, 1.0; 0.0, 0.0];
//! let b = dmatrix![0.0; 1.0];
//!
//! let (a_d, b_d) = discretize_ab(&a, &b, 1.0)?;
//! let x1 = &a_d * dvector![1.0, 1.0] + &b_d * dvector![1.0];
//!
//! assert!((x1[0] - 2.5).abs() < 1e-12);
//! assert!((x1[1] - 2.0).abs() < 1e-12);
//! # Ok::<(), zoh_discretize::Error>(())
//! ```
//!
//! # Logging
//!
//! Diagnostics are emitted through the [`log`] facade at `trace` and `debug`
//! level, plus a `warn` record when an exponential fails. No logger is
//! installed by this crate.

mod discretize;
mod error;
mod exponential;
mod operand;
mod sample_period;
mod system;

pub use discretize::{discretize_a, discretize_ab, discretize_aq, discretize_r};
pub use error::{Error, ErrorKind, Operand};
pub use sample_period::{SamplePeriod, SamplePeriodError};
pub use system::{DiscreteSystem, discretize_system};
