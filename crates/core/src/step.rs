use nalgebra::{DMatrix, DVector, SMatrix};

/// A trait for types that can be stepped using their derivative.
///
/// Implementing this trait lets generic ODE solvers advance the type by
/// `derivative * delta`, where the derivative is with respect to `Delta`.
/// While typically used for time integration, `Delta` can represent any
/// independent variable.
///
/// Scalars, `nalgebra` fixed-size matrices and vectors, and their dynamically
/// sized counterparts are integrable out of the box with `Delta = f64` and
/// `Derivative = Self`. Matrix-valued states are stepped element-wise, which
/// is what lets an integrator accumulate a matrix integral such as a noise
/// covariance.
pub trait StepIntegrable<Delta> {
    /// The derivative of the type with respect to `Delta`.
    type Derivative;

    /// Returns the value after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Type alias for the derivative of a `StepIntegrable` type.
///
/// This is a convenience for accessing the [`StepIntegrable::Derivative`]
/// associated type without writing out the fully qualified syntax.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;

impl StepIntegrable<f64> for f64 {
    type Derivative = f64;

    fn step(&self, derivative: f64, delta: f64) -> Self {
        self + derivative * delta
    }
}

impl<const R: usize, const C: usize> StepIntegrable<f64> for SMatrix<f64, R, C> {
    type Derivative = Self;

    fn step(&self, derivative: Self, delta: f64) -> Self {
        self + derivative * delta
    }
}

impl StepIntegrable<f64> for DMatrix<f64> {
    type Derivative = Self;

    fn step(&self, derivative: Self, delta: f64) -> Self {
        self + derivative * delta
    }
}

impl StepIntegrable<f64> for DVector<f64> {
    type Derivative = Self;

    fn step(&self, derivative: Self, delta: f64) -> Self {
        self + derivative * delta
    }
}
