use num_traits::Float;
use std::fmt::Debug;

use crate::math::optimization::{
    optimizer, summarize, Algorithm, LineSearch, ObjectiveFunction, OptimizationConfig,
    OptimizationResult,
};
use crate::math::optimization::vector::negate;

/// The steepest-descent direction `-∇f(x)`.
#[must_use]
pub fn steepest_descent<T: Float>(gradient: &[T]) -> Vec<T> {
    negate(gradient)
}

/// Minimizes an objective function using steepest descent.
///
/// Each iteration moves along the negative gradient by a step chosen with the
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
/// use descent::math::optimization::gradient_descent::minimize;
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
        Algorithm::SteepestDescent,
        LineSearch::CubicInterpolation,
        false,
    );
    summarize(f, initial_point, report)
}
