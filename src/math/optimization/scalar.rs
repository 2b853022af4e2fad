//! Adapters from functions of one variable to the vector form used by the descent methods.

use num_traits::Float;

use crate::error::{Error, Result};

/// Extracts the only coordinate of a one-dimensional point.
///
/// # Errors
///
/// Returns `Error::DimensionMismatch` unless `point` has exactly one coordinate.
pub fn sole<T: Copy>(point: &[T]) -> Result<T> {
    match point {
        [x] => Ok(*x),
        _ => Err(Error::DimensionMismatch {
            expected: 1,
            found: point.len(),
        }),
    }
}

/// Lifts `f: T -> T` to an objective on one-dimensional points.
///
/// # Panics
///
/// The returned function panics when applied to a point that is not one-dimensional.
pub fn lift_objective<T, F>(f: F) -> impl Fn(&[T]) -> T
where
    T: Float,
    F: Fn(T) -> T,
{
    move |point: &[T]| match sole(point) {
        Ok(x) => f(x),
        Err(err) => panic!("{err}"),
    }
}

/// Lifts a derivative `df: T -> T` to a gradient on one-dimensional points.
///
/// # Panics
///
/// The returned function panics when applied to a point that is not one-dimensional.
pub fn lift_gradient<T, G>(df: G) -> impl Fn(&[T]) -> Vec<T>
where
    T: Float,
    G: Fn(T) -> T,
{
    move |point: &[T]| match sole(point) {
        Ok(x) => vec![df(x)],
        Err(err) => panic!("{err}"),
    }
}
