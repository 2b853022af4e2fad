use num_traits::Float;
use std::fmt::Debug;

use crate::math::optimization::vector::dot;
use crate::math::optimization::{
    optimizer, summarize, Algorithm, LineSearch, ObjectiveFunction, OptimizationConfig,
    OptimizationResult,
};

/// Fletcher-Reeves update `p = -g + β·p_prev` with `β = (g·g) / (g_prev·g_prev)`.
///
/// Returns `None` if `g_prev·g_prev` is zero (or not a number), which means the
/// previous point was already stationary.
#[must_use]
pub fn fletcher_reeves<T: Float>(
    previous_gradient: &[T],
    previous_direction: &[T],
    gradient: &[T],
) -> Option<Vec<T>> {
    let previous_norm_sq = dot(previous_gradient, previous_gradient);
    if !(previous_norm_sq > T::zero()) {
        return None;
    }
    let beta = dot(gradient, gradient) / previous_norm_sq;

    Some(
        gradient
            .iter()
            .zip(previous_direction.iter())
            .map(|(&g, &p)| -g + beta * p)
            .collect(),
    )
}

/// Minimizes an objective function using the Fletcher-Reeves conjugate gradient method.
///
/// Directions are built with [`fletcher_reeves`] and restart from the negative
/// gradient whenever the update stops pointing downhill. Steps come from the
/// cubic-interpolation line search.
///
/// # Arguments
///
/// * `f` - The objective function to minimize
/// * `initial_point` - The starting point for optimization
/// * `config` - Configuration options for the optimization process
///
/// # Returns
///
/// Returns an `OptimizationResult` containing the optimal point found and optimization statistics.
///
/// # Examples
///
/// ```
/// use descent::math::optimization::{ObjectiveFunction, OptimizationConfig};
/// use descent::math::optimization::conjugate_gradient::minimize;
///
/// // Define a simple quadratic function
/// struct Quadratic;
///
/// impl ObjectiveFunction<f64> for Quadratic {
///     fn evaluate(&self, point: &[f64]) -> f64 {
///         point.iter().map(|x| x * x).sum()
///     }
///
///     fn gradient(&self, point: &[f64]) -> Vec<f64> {
///         point.iter().map(|x| 2.0 * x).collect()
///     }
/// }
///
/// let f = Quadratic;
/// let initial_point = vec![1.0, 1.0];
/// let config = OptimizationConfig::default();
///
/// let result = minimize(&f, &initial_point, &config);
/// assert!(result.converged);
/// ```
#[must_use]
pub fn minimize<T, F>(
    f: &F,
    initial_point: &[T],
    config: &OptimizationConfig<T>,
) -> OptimizationResult<T>
where
    T: Float + Debug,
    F: ObjectiveFunction<T>,
{
    let report = optimizer::run(
        config,
        |x: &[T]| f.evaluate(x),
        |x: &[T]| f.gradient(x),
        initial_point,
        Algorithm::ConjugateGradient,
        LineSearch::CubicInterpolation,
        false,
    );
    summarize(f, initial_point, report)
}
