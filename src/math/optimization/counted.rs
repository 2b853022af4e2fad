use num_traits::Float;

/// A function bundled with the number of times it has been applied.
///
/// The counter travels with the function by value, so every optimization run
/// that builds its own `Counted` starts from zero and never observes calls
/// made by another run.
///
/// # Examples
///
/// ```
/// use descent::math::optimization::Counted;
///
/// let mut square = Counted::new(|x: &f64| x * x);
/// assert_eq!(square.apply(&3.0_f64), 9.0);
/// assert_eq!(square.apply(&-2.0_f64), 4.0);
/// assert_eq!(square.calls(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Counted<F> {
    function: F,
    calls: usize,
}

impl<F> Counted<F> {
    pub fn new(function: F) -> Self {
        Self { function, calls: 0 }
    }

    /// Counts the call, then forwards `arg` to the wrapped function.
    pub fn apply<A, U>(&mut self, arg: &A) -> U
    where
        A: ?Sized,
        F: Fn(&A) -> U,
    {
        self.calls += 1;
        (self.function)(arg)
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Releases the wrapped function together with its final count.
    pub fn into_parts(self) -> (F, usize) {
        (self.function, self.calls)
    }
}

/// Objective and gradient evaluations consumed by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluations {
    pub objective: usize,
    pub gradient: usize,
}

/// An objective and its gradient, each with an independent call counter.
#[derive(Debug, Clone)]
pub(crate) struct Problem<F, G> {
    objective: Counted<F>,
    gradient: Counted<G>,
}

impl<F, G> Problem<F, G> {
    pub(crate) fn new(objective: F, gradient: G) -> Self {
        Self {
            objective: Counted::new(objective),
            gradient: Counted::new(gradient),
        }
    }

    pub(crate) fn value<T>(&mut self, x: &[T]) -> T
    where
        T: Float,
        F: Fn(&[T]) -> T,
    {
        self.objective.apply(x)
    }

    pub(crate) fn gradient<T>(&mut self, x: &[T]) -> Vec<T>
    where
        T: Float,
        G: Fn(&[T]) -> Vec<T>,
    {
        self.gradient.apply(x)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Counted<F>, &mut Counted<G>) {
        (&mut self.objective, &mut self.gradient)
    }

    pub(crate) fn evaluations(&self) -> Evaluations {
        Evaluations {
            objective: self.objective.calls(),
            gradient: self.gradient.calls(),
        }
    }
}
