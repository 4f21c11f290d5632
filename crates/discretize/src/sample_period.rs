use thiserror::Error;

/// A validated sample period in seconds.
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SamplePeriod(f64);

/// Errors that can occur when validating a sample period.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SamplePeriodError {
    #[error("sample period is not a number")]
    NotANumber,

    #[error("sample period must be finite")]
    Infinite,

    #[error("sample period must be strictly positive")]
    NotPositive,
}

impl SamplePeriod {
    /// Creates a sample period from a value in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is NaN, infinite, zero, or negative.
    pub fn new(seconds: f64) -> Result<Self, SamplePeriodError> {
        if seconds.is_nan() {
            return Err(SamplePeriodError::NotANumber);
        }
        if seconds.is_infinite() {
            return Err(SamplePeriodError::Infinite);
        }
        if seconds <= 0.0 {
            return Err(SamplePeriodError::NotPositive);
        }

        Ok(Self(seconds))
    }

    /// Returns the period in seconds.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for SamplePeriod {
    type Error = SamplePeriodError;

    fn try_from(seconds: f64) -> Result<Self, Self::Error> {
        Self::new(seconds)
    }
}
