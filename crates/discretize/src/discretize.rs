//! Zero-order-hold discretization of continuous operands.
//!
//! Each operation is a pure function of its inputs: operands are borrowed,
//! never modified, and every result is a freshly allocated matrix.
//!
//! # Van Loan's method
//!
//! Quantities that are integrals of matrix exponentials are read off blocks of
//! a single exponential of an augmented matrix. For the input matrix:
//!
//! ```text
//!       ( [ A  B ]      )   [ A_d  B_d ]
//!   exp ( [ 0  0 ] · dt ) = [ 0    I   ]
//! ```
//!
//! and for the process noise, with `Q_d = ∫₀^dt e^(Aτ) Q e^(Aᵀτ) dτ`:
//!
//! ```text
//!       ( [ -A  Q  ]      )   [ …  φ12 ]
//!   exp ( [  0  Aᵀ ] · dt ) = [ 0  φ22 ]      A_d = φ22ᵀ,  Q_d = φ22ᵀ · φ12
//! ```
//!
//! One exact exponential replaces a truncated series, so accuracy does not
//! degrade as `‖A‖·dt` grows. Conditioning of the exponential itself is left
//! to `nalgebra`, with one exception: for stiff non-normal `A` the `-A` block
//! grows like `e^(λ·dt)` and the product `φ22ᵀ · φ12` cancels away every
//! significant digit. Such a covariance is rejected rather than returned.

#[cfg(test)]
mod tests;

use nalgebra::DMatrix;

use crate::{
    Error, Operand, SamplePeriod,
    exponential::{VanLoanBlocks, check_covariance, expm, symmetrize},
    operand,
};

/// Discretizes the dynamics matrix: `A_d = e^(A·dt)`.
///
/// # Errors
///
/// Returns an error if `A` is not square or is empty, if `A` has non-finite
/// entries, if `dt` is not a finite positive number, or if the exponential
/// does not converge.
pub fn discretize_a(a: &DMatrix<f64>, dt: f64) -> Result<DMatrix<f64>, Error> {
    operand::square(Operand::A, a)?;
    operand::finite(Operand::A, a)?;
    let dt = SamplePeriod::new(dt)?.get();

    expm(&(a * dt))
}

/// Discretizes the dynamics and input matrices together.
///
/// Returns `(A_d, B_d)` read from one exponential of the `(n+m)×(n+m)`
/// augmented matrix `[[A, B], [0, 0]]·dt`.
///
/// # Errors
///
/// Returns an error if `A` is not square or is empty, if `B` does not have
/// `n` rows, if an operand has non-finite entries, if `dt` is not a finite
/// positive number, or if the exponential does not converge.
pub fn discretize_ab(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    dt: f64,
) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
    let n = operand::square(Operand::A, a)?;
    let m = b.ncols();
    operand::shape(Operand::B, b, (n, m))?;
    operand::finite(Operand::A, a)?;
    operand::finite(Operand::B, b)?;
    let dt = SamplePeriod::new(dt)?.get();

    let mut augmented = DMatrix::zeros(n + m, n + m);
    augmented.view_mut((0, 0), (n, n)).copy_from(a);
    augmented.view_mut((0, n), (n, m)).copy_from(b);
    augmented *= dt;

    let phi = expm(&augmented)?;

    let a_d = phi.view((0, 0), (n, n)).into_owned();
    let b_d = phi.view((0, n), (n, m)).into_owned();

    Ok((a_d, b_d))
}

/// Discretizes the dynamics matrix and the process noise intensity together.
///
/// Returns `(A_d, Q_d)` where `Q_d = ∫₀^dt e^(Aτ) Q e^(Aᵀτ) dτ`, computed by
/// Van Loan's method from one exponential of a `2n×2n` augmented matrix.
///
/// `Q_d` is symmetrized before it is returned, so it is exactly symmetric
/// regardless of rounding in the block products. `A_d` agrees with
/// [`discretize_a`] to rounding.
///
/// `Q` is expected to be symmetric positive-semidefinite. It is not checked
/// directly, but a `Q_d` with an eigenvalue meaningfully below zero is
/// rejected.
///
/// # Errors
///
/// Returns an error if `A` is not square or is empty, if `Q` is not `n×n`, if
/// an operand has non-finite entries, if `dt` is not a finite positive number,
/// or if the exponential does not converge. Non-convergence also covers a
/// `Q_d` that lost its precision to cancellation or came out indefinite; a
/// shorter `dt` avoids it, and the covariance over the full period follows
/// from `P ← A_d·P·A_dᵀ + Q_d` applied once per sub-step.
pub fn discretize_aq(
    a: &DMatrix<f64>,
    q: &DMatrix<f64>,
    dt: f64,
) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
    let n = operand::square(Operand::A, a)?;
    operand::shape(Operand::Q, q, (n, n))?;
    operand::finite(Operand::A, a)?;
    operand::finite(Operand::Q, q)?;
    let dt = SamplePeriod::new(dt)?.get();

    let mut augmented = DMatrix::zeros(2 * n, 2 * n);
    augmented.view_mut((0, 0), (n, n)).copy_from(&(-a));
    augmented.view_mut((0, n), (n, n)).copy_from(q);
    augmented.view_mut((n, n), (n, n)).copy_from(&a.transpose());
    augmented *= dt;

    let phi = expm(&augmented)?;

    let blocks = VanLoanBlocks {
        augmented_norm: augmented.norm(),
        scaled_q_norm: q.norm() * dt,
        phi11: phi.view((0, 0), (n, n)),
        phi12: phi.view((0, n), (n, n)),
        phi22: phi.view((n, n), (n, n)),
    };

    let a_d = blocks.phi22.transpose();
    let q_d = symmetrize(&(&a_d * blocks.phi12));
    check_covariance(&blocks, &q_d)?;

    Ok((a_d, q_d))
}

/// Discretizes the measurement noise intensity: `R_d = R / dt`.
///
/// Measurement noise is not propagated through the dynamics, so no
/// exponential is involved.
///
/// # Errors
///
/// Returns an error if `R` is not square or is empty, if `R` has non-finite
/// entries, or if `dt` is not a finite positive number.
pub fn discretize_r(r: &DMatrix<f64>, dt: f64) -> Result<DMatrix<f64>, Error> {
    operand::square(Operand::R, r)?;
    operand::finite(Operand::R, r)?;
    let dt = SamplePeriod::new(dt)?.get();

    Ok(r / dt)
}
