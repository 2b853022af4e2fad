pub mod conjugate_gradient;
pub mod counted;
pub mod diagnostics;
pub mod direction;
pub mod gradient_descent;
pub mod iterates;
pub mod line_search;
pub mod optimizer;
pub mod scalar;

mod bracket;
mod vector;


use num_traits::Float;
use std::fmt::Debug;

use crate::error::{Error, Result};

pub use conjugate_gradient::minimize as conjugate_gradient_minimize;
pub use counted::{Counted, Evaluations};
pub use diagnostics::{Diagnostics, Termination};
pub use direction::{Algorithm, Memory};
pub use gradient_descent::minimize as gradient_descent_minimize;
pub use iterates::{Halt, Iterate, Iterates};
pub use line_search::{choose_step_size, LineSearch};
pub use optimizer::Optimizer;

/// A trait for differentiable objective functions that can be optimized.
pub trait ObjectiveFunction<T>
where
    T: Float + Debug,
{
    /// Evaluates the objective function at the given point.
    fn evaluate(&self, point: &[T]) -> T;

    /// Computes the gradient of the objective function at the given point.
    fn gradient(&self, point: &[T]) -> Vec<T>;
}

/// Configuration options for the descent methods.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationConfig<T>
where
    T: Float + Debug,
{
    /// Maximum number of iterates produced, counting the initial point
    pub max_steps: usize,
    /// Gradient norm below which an iterate is accepted
    pub tolerance: T,
}

impl<T> Default for OptimizationConfig<T>
where
    T: Float + Debug,
{
    fn default() -> Self {
        Self {
            max_steps: 25_000,
            tolerance: vector::constant(1e-6),
        }
    }
}

impl<T> OptimizationConfig<T>
where
    T: Float + Debug,
{
    /// Checks that the step budget is positive and the tolerance is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig {
                reason: "max_steps must be positive",
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= T::zero() {
            return Err(Error::InvalidConfig {
                reason: "tolerance must be finite and positive",
            });
        }
        Ok(())
    }
}

/// Result of an optimization process.
#[derive(Debug, Clone)]
pub struct OptimizationResult<T>
where
    T: Float + Debug,
{
    /// The last point reached
    pub optimal_point: Vec<T>,
    /// The value of the objective function at that point
    pub optimal_value: T,
    /// Number of accepted steps
    pub iterations: usize,
    /// Whether the gradient norm fell below the tolerance
    pub converged: bool,
}

/// Shapes a run into an `OptimizationResult`, evaluating `f` at the start if no iterate was produced.
pub(crate) fn summarize<T, F>(
    f: &F,
    initial_point: &[T],
    report: optimizer::Report<T>,
) -> OptimizationResult<T>
where
    T: Float + Debug,
    F: ObjectiveFunction<T>,
{
    let converged = report.termination == Termination::Converged;
    let iterations = report.steps.saturating_sub(1);
    match report.last {
        Some(last) => OptimizationResult {
            optimal_point: last.point,
            optimal_value: last.value,
            iterations,
            converged,
        },
        None => OptimizationResult {
            optimal_point: initial_point.to_vec(),
            optimal_value: f.evaluate(initial_point),
            iterations,
            converged,
        },
    }
}
