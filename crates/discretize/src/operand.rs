//! Shape and value checks shared by the discretization operations.

use nalgebra::{Dim, Matrix, RawStorage};

use crate::{Error, Operand};

/// Checks that `m` is square and non-empty, returning its size.
pub(crate) fn square<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(
    operand: Operand,
    m: &Matrix<f64, R, C, S>,
) -> Result<usize, Error> {
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(Error::NotSquare {
            operand,
            rows,
            cols,
        });
    }
    if rows == 0 {
        return Err(Error::Empty { operand });
    }
    Ok(rows)
}

/// Checks that `m` has exactly the expected shape.
pub(crate) fn shape<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(
    operand: Operand,
    m: &Matrix<f64, R, C, S>,
    expected: (usize, usize),
) -> Result<(), Error> {
    let actual = m.shape();
    if actual == expected {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            operand,
            expected,
            actual,
        })
    }
}

/// Checks that `m` holds no NaN or infinite entries.
pub(crate) fn finite<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(
    operand: Operand,
    m: &Matrix<f64, R, C, S>,
) -> Result<(), Error> {
    if m.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFinite { operand })
    }
}
