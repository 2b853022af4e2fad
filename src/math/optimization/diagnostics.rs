use super::counted::Evaluations;
use super::iterates::Iterate;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The gradient norm dropped below the tolerance.
    Converged,
    /// The step budget ran out first.
    Exhausted,
    /// No step could be found from the last point.
    StepSearchFailed,
}

/// Trace and cost of one run, in iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics<T> {
    trace: Vec<Iterate<T>>,
    evaluations: Evaluations,
    termination: Termination,
}

impl<T> Diagnostics<T> {
    pub(crate) fn new(
        trace: Vec<Iterate<T>>,
        evaluations: Evaluations,
        termination: Termination,
    ) -> Self {
        Self {
            trace,
            evaluations,
            termination,
        }
    }

    /// Every iterate visited, starting with the initial point.
    #[must_use]
    pub fn trace(&self) -> &[Iterate<T>] {
        &self.trace
    }

    #[must_use]
    pub fn into_trace(self) -> Vec<Iterate<T>> {
        self.trace
    }

    #[must_use]
    pub fn evaluations(&self) -> Evaluations {
        self.evaluations
    }

    #[must_use]
    pub fn objective_evaluations(&self) -> usize {
        self.evaluations.objective
    }

    #[must_use]
    pub fn gradient_evaluations(&self) -> usize {
        self.evaluations.gradient
    }

    #[must_use]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Accepted steps, not counting the initial point.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.trace.len().saturating_sub(1)
    }
}
