use std::fmt::Debug;

use log::debug;
use num_traits::Float;

use crate::error::Result;

use super::counted::Evaluations;
use super::diagnostics::{Diagnostics, Termination};
use super::direction::Algorithm;
use super::iterates::{Halt, Iterate, Iterates};
use super::line_search::LineSearch;
use super::scalar::{lift_gradient, lift_objective};
use super::OptimizationConfig;

/// Outcome of a bounded run, before it is shaped for a caller.
#[derive(Debug, Clone)]
pub(crate) struct Report<T> {
    pub(crate) last: Option<Iterate<T>>,
    pub(crate) steps: usize,
    pub(crate) termination: Termination,
    pub(crate) evaluations: Evaluations,
    pub(crate) trace: Option<Vec<Iterate<T>>>,
}

/// Pulls iterates until convergence, a halt, or `config.max_steps` iterates.
///
/// The trace is only kept when `record` is set; otherwise just the latest
/// iterate is held.
pub(crate) fn run<T, F, G>(
    config: &OptimizationConfig<T>,
    objective: F,
    gradient: G,
    initial_point: &[T],
    algorithm: Algorithm,
    line_search: LineSearch,
    record: bool,
) -> Report<T>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let mut iterates = Iterates::new(
        objective,
        gradient,
        initial_point.to_vec(),
        algorithm,
        line_search,
    );
    let mut trace = record.then(Vec::new);
    let mut last = None;
    let mut steps = 0;
    let mut termination = Termination::Exhausted;

    while steps < config.max_steps {
        let Some(iterate) = iterates.next() else {
            termination = match iterates.halt() {
                Some(Halt::Stationary) => Termination::Converged,
                _ => Termination::StepSearchFailed,
            };
            break;
        };
        steps += 1;

        let converged = iterate.gradient_norm < config.tolerance;
        match trace.as_mut() {
            Some(trace) => trace.push(iterate),
            None => last = Some(iterate),
        }
        if converged {
            termination = Termination::Converged;
            break;
        }
    }

    let evaluations = iterates.evaluations();
    debug!(
        "{:?} with {:?} finished after {} iterates: {:?}, {} objective and {} gradient evaluations",
        algorithm, line_search, steps, termination, evaluations.objective, evaluations.gradient
    );

    if let Some(trace) = &trace {
        last = trace.last().cloned();
    }
    Report {
        last,
        steps,
        termination,
        evaluations,
        trace,
    }
}

impl<T> Report<T> {
    fn into_parts(self) -> (Option<Vec<T>>, Option<Diagnostics<T>>) {
        let point = match (self.termination, self.last) {
            (Termination::Converged, Some(iterate)) => Some(iterate.point),
            _ => None,
        };
        let diagnostics = self
            .trace
            .map(|trace| Diagnostics::new(trace, self.evaluations, self.termination));
        (point, diagnostics)
    }
}

/// Descent driver with a fixed step budget and convergence tolerance.
///
/// # Examples
///
/// ```
/// use descent::math::optimization::{Algorithm, LineSearch, Optimizer, Termination};
///
/// let optimizer = Optimizer::<f64>::default();
/// let (point, diagnostics) = optimizer.minimize(
///     |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 3.0).powi(2),
///     |x: &[f64]| vec![2.0 * (x[0] - 1.0), 4.0 * (x[1] + 3.0)],
///     &[0.0, 0.0],
///     Algorithm::ConjugateGradient,
///     LineSearch::Exact,
///     true,
/// );
///
/// let point = point.expect("converged");
/// assert!((point[0] - 1.0).abs() < 1e-6);
/// assert!((point[1] + 3.0).abs() < 1e-6);
///
/// let diagnostics = diagnostics.expect("requested");
/// assert_eq!(diagnostics.termination(), Termination::Converged);
/// assert!(diagnostics.iterations() <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer<T>
where
    T: Float + Debug,
{
    config: OptimizationConfig<T>,
}

impl<T> Default for Optimizer<T>
where
    T: Float + Debug,
{
    fn default() -> Self {
        Self {
            config: OptimizationConfig::default(),
        }
    }
}

impl<T> Optimizer<T>
where
    T: Float + Debug,
{
    /// Creates an optimizer after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the step budget is zero or the
    /// tolerance is not finite and positive.
    pub fn new(config: OptimizationConfig<T>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &OptimizationConfig<T> {
        &self.config
    }

    /// Minimizes `objective` from `initial_point`.
    ///
    /// The point is returned only when the run converged. Diagnostics are
    /// returned only when `diagnostics` is set, and hold the full trace up
    /// to and including the final iterate.
    pub fn minimize<F, G>(
        &self,
        objective: F,
        gradient: G,
        initial_point: &[T],
        algorithm: Algorithm,
        line_search: LineSearch,
        diagnostics: bool,
    ) -> (Option<Vec<T>>, Option<Diagnostics<T>>)
    where
        F: Fn(&[T]) -> T,
        G: Fn(&[T]) -> Vec<T>,
    {
        run(
            &self.config,
            objective,
            gradient,
            initial_point,
            algorithm,
            line_search,
            diagnostics,
        )
        .into_parts()
    }

    /// Minimizes a function of one variable given its derivative.
    ///
    /// # Examples
    ///
    /// ```
    /// use descent::math::optimization::{Algorithm, LineSearch, Optimizer};
    ///
    /// let (x, _) = Optimizer::<f64>::default().minimize_scalar(
    ///     |x| x * x,
    ///     |x| 2.0 * x,
    ///     5.0,
    ///     Algorithm::SteepestDescent,
    ///     LineSearch::Exact,
    ///     false,
    /// );
    /// assert!(x.expect("converged").abs() < 1e-6);
    /// ```
    pub fn minimize_scalar<F, G>(
        &self,
        objective: F,
        derivative: G,
        initial_point: T,
        algorithm: Algorithm,
        line_search: LineSearch,
        diagnostics: bool,
    ) -> (Option<T>, Option<Diagnostics<T>>)
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let (point, diagnostics) = self.minimize(
            lift_objective(objective),
            lift_gradient(derivative),
            &[initial_point],
            algorithm,
            line_search,
            diagnostics,
        );
        (point.and_then(|point| point.first().copied()), diagnostics)
    }

    /// Returns the lazy, unbounded iterate stream without applying the budget or tolerance.
    pub fn iterates<F, G>(
        &self,
        objective: F,
        gradient: G,
        initial_point: &[T],
        algorithm: Algorithm,
        line_search: LineSearch,
    ) -> Iterates<T, F, G>
    where
        F: Fn(&[T]) -> T,
        G: Fn(&[T]) -> Vec<T>,
    {
        Iterates::new(
            objective,
            gradient,
            initial_point.to_vec(),
            algorithm,
            line_search,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use approx::assert_relative_eq;

    fn square(x: &[f64]) -> f64 {
        x[0] * x[0]
    }

    fn square_gradient(x: &[f64]) -> Vec<f64> {
        vec![2.0 * x[0]]
    }

    #[test]
    fn test_new_validates_config() {
        let err = Optimizer::new(OptimizationConfig {
            max_steps: 0,
            tolerance: 1e-6,
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = Optimizer::new(OptimizationConfig {
            max_steps: 10,
            tolerance: -1.0,
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let optimizer = Optimizer::new(OptimizationConfig {
            max_steps: 10,
            tolerance: 1e-3,
        })
        .expect("valid");
        assert_eq!(optimizer.config().max_steps, 10);
    }

    #[test]
    fn test_square_converges_with_steepest_descent_and_exact_search() {
        let (point, diagnostics) = Optimizer::default().minimize(
            square,
            square_gradient,
            &[5.0],
            Algorithm::SteepestDescent,
            LineSearch::Exact,
            true,
        );

        let point = point.expect("converged");
        assert_relative_eq!(point[0], 0.0, epsilon = 1e-7);

        let diagnostics = diagnostics.expect("requested");
        assert_eq!(diagnostics.termination(), Termination::Converged);
        assert!(diagnostics.iterations() < 10);
        let last = diagnostics.trace().last().expect("non-empty trace");
        assert!(last.gradient_norm < 1e-6);
    }

    #[test]
    fn test_stationary_start_converges_immediately() {
        for algorithm in [Algorithm::SteepestDescent, Algorithm::ConjugateGradient] {
            let (point, diagnostics) = Optimizer::default().minimize(
                square,
                square_gradient,
                &[0.0],
                algorithm,
                LineSearch::CubicInterpolation,
                true,
            );

            assert_eq!(point, Some(vec![0.0]));
            let diagnostics = diagnostics.expect("requested");
            assert_eq!(diagnostics.trace().len(), 1);
            // Only the initial point was evaluated: no line search ran.
            assert_eq!(
                diagnostics.evaluations(),
                Evaluations {
                    objective: 1,
                    gradient: 1,
                }
            );
        }
    }

    #[test]
    fn test_exhausted_budget_returns_no_point() {
        let optimizer = Optimizer::new(OptimizationConfig {
            max_steps: 3,
            tolerance: 1e-12,
        })
        .expect("valid");
        let (point, diagnostics) = optimizer.minimize(
            |x: &[f64]| x[0].powi(2) + 50.0 * x[1].powi(2),
            |x: &[f64]| vec![2.0 * x[0], 100.0 * x[1]],
            &[3.0, 1.0],
            Algorithm::SteepestDescent,
            LineSearch::CubicInterpolation,
            true,
        );

        assert!(point.is_none());
        let diagnostics = diagnostics.expect("requested");
        assert_eq!(diagnostics.termination(), Termination::Exhausted);
        assert_eq!(diagnostics.trace().len(), 3);
    }

    #[test]
    fn test_failed_step_search_keeps_partial_trace() {
        // The supplied gradient has the wrong sign, so no step ever decreases f.
        let (point, diagnostics) = Optimizer::default().minimize(
            square,
            |x: &[f64]| vec![-2.0 * x[0]],
            &[1.0],
            Algorithm::SteepestDescent,
            LineSearch::Exact,
            true,
        );

        assert!(point.is_none());
        let diagnostics = diagnostics.expect("requested");
        assert_eq!(diagnostics.termination(), Termination::StepSearchFailed);
        assert_eq!(diagnostics.trace().len(), 1);
        assert_eq!(diagnostics.trace()[0].point, vec![1.0]);
    }

    #[test]
    fn test_diagnostics_are_opt_in() {
        let (point, diagnostics) = Optimizer::default().minimize(
            square,
            square_gradient,
            &[5.0],
            Algorithm::ConjugateGradient,
            LineSearch::CubicInterpolation,
            false,
        );
        assert!(point.is_some());
        assert!(diagnostics.is_none());
    }

    #[test]
    fn test_scalar_overload_matches_vector_form() {
        let optimizer = Optimizer::default();
        let (x, scalar) = optimizer.minimize_scalar(
            |x: f64| (x - 3.0).powi(2),
            |x: f64| 2.0 * (x - 3.0),
            -1.0,
            Algorithm::SteepestDescent,
            LineSearch::CubicInterpolation,
            true,
        );
        let (point, vector) = optimizer.minimize(
            |x: &[f64]| (x[0] - 3.0).powi(2),
            |x: &[f64]| vec![2.0 * (x[0] - 3.0)],
            &[-1.0],
            Algorithm::SteepestDescent,
            LineSearch::CubicInterpolation,
            true,
        );

        assert_eq!(x, point.map(|p| p[0]));
        assert_eq!(scalar, vector);
        assert_relative_eq!(x.expect("converged"), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_iterates_can_be_consumed_directly() {
        let optimizer = Optimizer::default();
        let mut iterates = optimizer.iterates(
            square,
            square_gradient,
            &[5.0],
            Algorithm::SteepestDescent,
            LineSearch::Exact,
        );

        let first = iterates.next().expect("initial point");
        assert_eq!(first.point, vec![5.0]);
        let second = iterates.next().expect("one step");
        assert!(second.value < first.value);
    }
}
