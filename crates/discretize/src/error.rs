use std::fmt;

use thiserror::Error;

use crate::SamplePeriodError;

/// Names the matrix operand an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Continuous dynamics matrix.
    A,
    /// Continuous input matrix.
    B,
    /// Continuous process noise intensity.
    Q,
    /// Continuous measurement noise intensity.
    R,
    /// State vector.
    X,
    /// Input vector.
    U,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "A",
            Self::B => "B",
            Self::Q => "Q",
            Self::R => "R",
            Self::X => "x",
            Self::U => "u",
        };
        f.write_str(name)
    }
}

/// Broad classification of discretization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand shapes are inconsistent.
    DimensionMismatch,

    /// A scalar or matrix argument is outside its valid domain.
    InvalidArgument,

    /// The matrix exponential did not produce a finite result.
    NumericalNonConvergence,
}

/// Errors that can occur during discretization.
///
/// Every failure is final; no operation retries internally. A caller facing
/// [`ErrorKind::NumericalNonConvergence`] can split `dt` into sub-steps and
/// call again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{operand} must be square, got {rows}x{cols}")]
    NotSquare {
        operand: Operand,
        rows: usize,
        cols: usize,
    },

    #[error("{operand} must not be empty")]
    Empty { operand: Operand },

    #[error(
        "{operand} must be {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    ShapeMismatch {
        operand: Operand,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid sample period: {0}")]
    SamplePeriod(#[from] SamplePeriodError),

    #[error("{operand} contains non-finite entries")]
    NonFinite { operand: Operand },

    /// The exponential overflowed, or its blocks cancelled below usable
    /// precision. Splitting the sample period into shorter steps avoids it.
    #[error("matrix exponential of a {size}x{size} matrix did not converge to a usable result")]
    NonConvergence { size: usize },
}

impl Error {
    /// Returns the broad classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotSquare { .. } | Self::Empty { .. } | Self::ShapeMismatch { .. } => {
                ErrorKind::DimensionMismatch
            }
            Self::SamplePeriod(_) | Self::NonFinite { .. } => ErrorKind::InvalidArgument,
            Self::NonConvergence { .. } => ErrorKind::NumericalNonConvergence,
        }
    }
}
