use nalgebra::{DMatrix, DVector};

use crate::{
    Error, Operand, SamplePeriod, discretize_ab, discretize_aq, discretize_r, operand,
};

/// A discrete-time linear model with its noise covariances.
///
/// Describes the recurrence `x[k+1] = A_d x[k] + B_d u[k]` sampled every
/// `sample_period`, with process noise covariance `Q_d` and measurement noise
/// covariance `R_d`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteSystem {
    /// State transition matrix `A_d`, `n×n`.
    pub a: DMatrix<f64>,
    /// Input matrix `B_d`, `n×m`.
    pub b: DMatrix<f64>,
    /// Process noise covariance `Q_d`, `n×n`.
    pub q: DMatrix<f64>,
    /// Measurement noise covariance `R_d`.
    pub r: DMatrix<f64>,
    /// Period the model was sampled at.
    pub sample_period: SamplePeriod,
}

impl DiscreteSystem {
    /// Number of states.
    #[must_use]
    pub fn states(&self) -> usize {
        self.a.nrows()
    }

    /// Number of inputs.
    #[must_use]
    pub fn inputs(&self) -> usize {
        self.b.ncols()
    }

    /// Advances the state one sample: `A_d x + B_d u`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` or `u` does not match the system dimensions.
    pub fn predict(&self, x: &DVector<f64>, u: &DVector<f64>) -> Result<DVector<f64>, Error> {
        operand::shape(Operand::X, x, (self.states(), 1))?;
        operand::shape(Operand::U, u, (self.inputs(), 1))?;

        Ok(&self.a * x + &self.b * u)
    }
}

/// Discretizes a complete continuous model in one call.
///
/// `A_d` and `B_d` come from [`discretize_ab`], `Q_d` from [`discretize_aq`],
/// and `R_d` from [`discretize_r`]. All operand shapes are checked before any
/// exponential is evaluated.
///
/// # Errors
///
/// Returns an error if any operand has the wrong shape or non-finite entries,
/// if `dt` is not a finite positive number, or if an exponential does not
/// converge.
pub fn discretize_system(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    q: &DMatrix<f64>,
    r: &DMatrix<f64>,
    dt: f64,
) -> Result<DiscreteSystem, Error> {
    let n = operand::square(Operand::A, a)?;
    operand::shape(Operand::B, b, (n, b.ncols()))?;
    operand::shape(Operand::Q, q, (n, n))?;
    operand::square(Operand::R, r)?;
    let sample_period = SamplePeriod::new(dt)?;

    let (a_d, b_d) = discretize_ab(a, b, dt)?;
    let (_, q_d) = discretize_aq(a, q, dt)?;
    let r_d = discretize_r(r, dt)?;

    Ok(DiscreteSystem {
        a: a_d,
        b: b_d,
        q: q_d,
        r: r_d,
        sample_period,
    })
}
