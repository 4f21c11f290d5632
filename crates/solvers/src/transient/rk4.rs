//! Classical 4th-order Runge-Kutta for time-varying vector fields.
//!
//! Advances a state `x` from `t0` by `dt` under a vector field `f(t, x)` that
//! may depend explicitly on time:
//!
//! ```text
//! k1 = f(t0,        x)
//! k2 = f(t0 + dt/2, x + dt/2 * k1)
//! k3 = f(t0 + dt/2, x + dt/2 * k2)
//! k4 = f(t0 + dt,   x + dt * k3)
//!
//! x_next = x + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
//! ```
//!
//! The update is element-wise linear in `x`, so the state may be a scalar, a
//! vector, or a matrix. Integrating a matrix-valued `f(t, _)` that ignores `x`
//! from a zero state yields a quadrature of `f` over `[t0, t0 + dt]`.
//!
//! A step is deterministic and keeps no state between calls. There is no
//! error estimate and no step-size adaptation.
//!
//! # Example
//!
//! ```
//! use zoh_solvers::transient::rk4;
//!
//! // dx/dt = t, x(0) = 0  =>  x(1) = 0.5
//! let x = rk4::step(|t, _x: &f64| t, 0.0, &0.0, 1.0);
//! assert!((x - 0.5).abs() < 1e-15);
//! ```

mod action;
mod event;
mod point;
mod solution;


pub use action::Action;
pub use event::Event;
pub use point::Point;
pub use solution::{Solution, Status};

use std::ops::{Add, Mul};

use zoh_core::{Observer, StepIntegrable};

/// Advances `x` from `t0` by one step of size `dt`.
///
/// Calls `f` exactly four times, with times `t0`, `t0 + dt/2` (twice), and
/// `t0 + dt`. The caller's state is not modified.
pub fn step<S, D, F>(mut f: F, t0: f64, x: &S, dt: f64) -> S
where
    S: StepIntegrable<f64, Derivative = D>,
    D: Clone + Add<Output = D> + Mul<f64, Output = D>,
    F: FnMut(f64, &S) -> D,
{
    let Ok(next) = try_step(|t, x: &S| Ok::<_, std::convert::Infallible>(f(t, x)), t0, x, dt);
    next
}

/// Advances `x` from `t0` by one step of size `dt` under a fallible field.
///
/// Behaves like [`step`], except that `f` may fail.
///
/// # Errors
///
/// Returns the first error produced by `f`, unchanged. No partial result is
/// returned and the remaining stages are not evaluated.
pub fn try_step<S, D, E, F>(mut f: F, t0: f64, x: &S, dt: f64) -> Result<S, E>
where
    S: StepIntegrable<f64, Derivative = D>,
    D: Clone + Add<Output = D> + Mul<f64, Output = D>,
    F: FnMut(f64, &S) -> Result<D, E>,
{
    let half_dt = dt / 2.0;

    let k1 = f(t0, x)?;
    let k2 = f(t0 + half_dt, &x.step(k1.clone(), half_dt))?;
    let k3 = f(t0 + half_dt, &x.step(k2.clone(), half_dt))?;
    let k4 = f(t0 + dt, &x.step(k3.clone(), dt))?;

    let slope = k1 + (k2 + k3) * 2.0 + k4;

    Ok(x.step(slope, dt / 6.0))
}

/// Integrates `steps` fixed RK4 steps of size `dt` starting at `(t0, x0)`.
///
/// # Algorithm
///
/// 1. Record the initial point and emit it as step 0.
/// 2. For each step `k`:
///    - Advance the state with [`try_step`] from `t0 + (k-1)*dt`.
///    - Record the new point at `t0 + k*dt`.
///    - Emit an [`Event`] to the observer.
///    - If the observer returns [`Action::StopEarly`], terminate.
/// 3. Return the solution with the full history.
///
/// Step times are computed as `t0 + k*dt` rather than accumulated, so long
/// runs do not drift in time.
///
/// # Errors
///
/// Returns the first error produced by `f`, unchanged.
pub fn solve<S, D, E, F, Obs>(
    mut f: F,
    t0: f64,
    x0: S,
    dt: f64,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution<S>, E>
where
    S: StepIntegrable<f64, Derivative = D> + Clone,
    D: Clone + Add<Output = D> + Mul<f64, Output = D>,
    F: FnMut(f64, &S) -> Result<D, E>,
    Obs: Observer<Event<S>, Action>,
{
    let initial = Point {
        time: t0,
        state: x0,
    };

    let mut history = Vec::with_capacity(steps + 1);
    history.push(initial.clone());

    let event = Event {
        step: 0,
        point: initial.clone(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            history,
            steps: 0,
        });
    }

    let mut current = initial;

    for step in 1..=steps {
        let state = try_step(&mut f, current.time, &current.state, dt)?;

        #[allow(clippy::cast_precision_loss)]
        let next = Point {
            time: t0 + step as f64 * dt,
            state,
        };

        history.push(next.clone());

        let event = Event {
            step,
            point: next.clone(),
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            });
        }

        current = next;
    }

    Ok(Solution {
        status: Status::Complete,
        history,
        steps,
    })
}

/// Integrates fixed RK4 steps without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Returns the first error produced by `f`, unchanged.
pub fn solve_unobserved<S, D, E, F>(
    f: F,
    t0: f64,
    x0: S,
    dt: f64,
    steps: usize,
) -> Result<Solution<S>, E>
where
    S: StepIntegrable<f64, Derivative = D> + Clone,
    D: Clone + Add<Output = D> + Mul<f64, Output = D>,
    F: FnMut(f64, &S) -> Result<D, E>,
{
    solve(f, t0, x0, dt, steps, ())
}
