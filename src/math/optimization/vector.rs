//! Dense vector arithmetic on slices shared by the descent methods.

use num_traits::Float;

/// Converts an `f64` constant into `T`, rounding to the nearest representable value.
#[inline]
pub(crate) fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

#[inline]
pub(crate) fn dot<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&a_i, &b_i)| acc + a_i * b_i)
}

#[inline]
pub(crate) fn norm<T: Float>(v: &[T]) -> T {
    dot(v, v).sqrt()
}

/// Returns `x + alpha * p`.
#[inline]
pub(crate) fn step<T: Float>(x: &[T], alpha: T, p: &[T]) -> Vec<T> {
    x.iter()
        .zip(p.iter())
        .map(|(&x_i, &p_i)| x_i + alpha * p_i)
        .collect()
}

#[inline]
pub(crate) fn negate<T: Float>(v: &[T]) -> Vec<T> {
    v.iter().map(|&v_i| -v_i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_and_norm() {
        let a = [3.0, 4.0];
        let b = [1.0, -2.0];
        assert_relative_eq!(dot(&a, &b), -5.0);
        assert_relative_eq!(norm(&a), 5.0);
        assert_relative_eq!(norm::<f64>(&[]), 0.0);
    }

    #[test]
    fn test_step_moves_along_direction() {
        let x = step(&[1.0, 2.0], 0.5, &[2.0, -4.0]);
        assert_eq!(x, vec![2.0, 0.0]);
        assert_eq!(negate(&[1.0, -2.0]), vec![-1.0, 2.0]);
    }

    #[test]
    fn test_constant_converts_to_f32() {
        let c: f32 = constant(0.5);
        assert_relative_eq!(c, 0.5_f32);
    }
}
