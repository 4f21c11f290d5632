//! Matrix exponential, symmetrization, and covariance precision helpers.

use nalgebra::{DMatrix, DMatrixView};

use crate::Error;

/// Computes `e^m`, failing if the result is not finite.
///
/// `nalgebra` evaluates the exponential by scaling and squaring with a Padé
/// approximant. It does not report failure itself; overflow or a breakdown in
/// the squaring phase shows up as infinite or NaN entries.
pub(crate) fn expm(m: &DMatrix<f64>) -> Result<DMatrix<f64>, Error> {
    let size = m.nrows();
    log::trace!("exponentiating {size}x{size} matrix, norm {:e}", m.norm());

    let phi = m.exp();

    if phi.iter().all(|v| v.is_finite()) {
        Ok(phi)
    } else {
        log::warn!("matrix exponential of {size}x{size} matrix produced non-finite entries");
        Err(Error::NonConvergence { size })
    }
}

/// Returns `(m + mᵀ) / 2`.
///
/// The result is exactly symmetric: entries `(i, j)` and `(j, i)` are computed
/// from the same operands.
pub(crate) fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    let transposed = m.transpose();
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("removing asymmetry of {:e}", (m - &transposed).norm());
    }

    (m + transposed) * 0.5
}

/// Relative precision a Van Loan covariance must retain to be returned.
const COVARIANCE_PRECISION: f64 = 1e-6;

/// Blocks of a Van Loan exponential needed to judge the precision of `Q_d`.
pub(crate) struct VanLoanBlocks<'a> {
    /// Frobenius norm of the augmented matrix `[[-A, Q], [0, Aᵀ]]·dt`.
    pub augmented_norm: f64,
    /// Frobenius norm of `Q·dt`.
    pub scaled_q_norm: f64,
    pub phi11: DMatrixView<'a, f64>,
    pub phi12: DMatrixView<'a, f64>,
    pub phi22: DMatrixView<'a, f64>,
}

/// Rejects a covariance whose significant digits were lost to cancellation.
///
/// For a stiff non-normal `A` the `e^(-A·dt)` block grows like `e^(λ·dt)`
/// while `Q_d = φ22ᵀ·φ12` stays small, so rounding in `φ12` swamps the
/// product without producing non-finite entries. The absolute error of `Q_d`
/// is estimated as
///
/// ```text
/// ε · (1 + ‖M‖) · ‖φ22‖ · (‖φ12‖ + ‖φ11‖·‖Q·dt‖)
/// ```
///
/// and must stay below a fixed fraction of `‖Q_d‖`. Independently, no
/// eigenvalue of `Q_d` may fall below minus that fraction of `‖Q_d‖`.
pub(crate) fn check_covariance(
    blocks: &VanLoanBlocks<'_>,
    q_d: &DMatrix<f64>,
) -> Result<(), Error> {
    let size = 2 * q_d.nrows();
    let magnitude = q_d.norm();

    let error = f64::EPSILON
        * (1.0 + blocks.augmented_norm)
        * blocks.phi22.norm()
        * (blocks.phi12.norm() + blocks.phi11.norm() * blocks.scaled_q_norm);
    log::trace!("covariance of norm {magnitude:e} carries estimated error {error:e}");

    if !(error <= COVARIANCE_PRECISION * magnitude) {
        log::warn!(
            "covariance of norm {magnitude:e} lost its precision to cancellation, estimated error {error:e}"
        );
        return Err(Error::NonConvergence { size });
    }

    let lowest = q_d.symmetric_eigenvalues().min();
    if lowest < -COVARIANCE_PRECISION * magnitude {
        log::warn!("covariance of norm {magnitude:e} is indefinite, eigenvalue {lowest:e}");
        return Err(Error::NonConvergence { size });
    }

    Ok(())
}
