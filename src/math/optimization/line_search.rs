//! Step-length selection along a descent direction.
//!
//! A search first brackets a minimum of the restriction `φ(α) = f(x + α·p)`
//! and then refines the bracket with either safeguarded cubic interpolation
//! or an exact golden-section search. Every step it returns lies strictly
//! below `φ(0)`.

use std::fmt::Debug;

use log::trace;
use num_traits::Float;

use super::bracket::{self, Bracket, Sample};
use super::counted::{Counted, Problem};
use super::vector::{constant, dot, step};

/// Upper bound on refinement probes after a bracket is found.
const MAX_REFINEMENTS: usize = 100;

/// Relative bracket width at which refinement stops.
const EXACT_TOLERANCE: f64 = 1e-12;

/// Cubic refinement stops once `|φ'(α)| <= CUBIC_SLOPE_RATIO * |φ'(0)|`.
const CUBIC_SLOPE_RATIO: f64 = 0.1;

/// Cubic trial steps are kept at least this fraction of the interval away from its ends.
const CUBIC_SAFEGUARD: f64 = 0.05;

/// Values within this many machine epsilons (relative) are treated as equal.
const FLAT_ULPS: f64 = 16.0;

/// `1 - 1/φ`, the golden-section probe fraction.
const GOLDEN_FRACTION: f64 = 0.381_966_011_250_105_1;

/// How a bracket is refined to a single step length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineSearch {
    /// Fit cubics through bracket ends using values and slopes; bisect when the fit degenerates.
    #[default]
    CubicInterpolation,
    /// Golden-section search, then bisection on the slope, down to machine precision.
    Exact,
}

/// A step accepted by the line search.
#[derive(Debug, Clone)]
pub(crate) struct Step<T> {
    pub(crate) alpha: T,
    pub(crate) value: T,
    pub(crate) gradient: Option<Vec<T>>,
}

/// The objective restricted to the ray `x + α·p`.
pub(crate) struct Line<'a, T, F, G> {
    objective: &'a mut Counted<F>,
    gradient: &'a mut Counted<G>,
    origin: &'a [T],
    direction: &'a [T],
}

impl<'a, T, F, G> Line<'a, T, F, G>
where
    T: Float,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    pub(crate) fn new(
        objective: &'a mut Counted<F>,
        gradient: &'a mut Counted<G>,
        origin: &'a [T],
        direction: &'a [T],
    ) -> Self {
        Self {
            objective,
            gradient,
            origin,
            direction,
        }
    }

    pub(crate) fn direction(&self) -> &'a [T] {
        self.direction
    }

    pub(crate) fn sample(&mut self, alpha: T) -> Sample<T> {
        let point = step(self.origin, alpha, self.direction);
        Sample::new(alpha, self.objective.apply(point.as_slice()))
    }

    pub(crate) fn gradient_at(&mut self, alpha: T) -> Vec<T> {
        let point = step(self.origin, alpha, self.direction);
        self.gradient.apply(point.as_slice())
    }

    /// Returns `φ'(α) = ∇f(x + α·p) · p`, evaluating the gradient only once per sample.
    pub(crate) fn slope(&mut self, sample: &mut Sample<T>) -> T {
        if let Some(gradient) = &sample.gradient {
            return dot(gradient, self.direction);
        }
        let gradient = self.gradient_at(sample.alpha);
        let slope = dot(&gradient, self.direction);
        sample.gradient = Some(gradient);
        slope
    }
}

impl<F, G> Problem<F, G> {
    pub(crate) fn line<'a, T>(&'a mut self, origin: &'a [T], direction: &'a [T]) -> Line<'a, T, F, G>
    where
        T: Float,
        F: Fn(&[T]) -> T,
        G: Fn(&[T]) -> Vec<T>,
    {
        let (objective, gradient) = self.parts_mut();
        Line::new(objective, gradient, origin, direction)
    }
}

/// Chooses a step length `α > 0` along `p` with `f(x + α·p) < f(x)`.
///
/// Returns `None` when `p` is not a descent direction at `x`, or when no
/// bracket can be established along it.
///
/// # Examples
///
/// ```
/// use descent::math::optimization::{choose_step_size, Counted, LineSearch};
///
/// let mut f = Counted::new(|x: &[f64]| x[0] * x[0]);
/// let mut df = Counted::new(|x: &[f64]| vec![2.0 * x[0]]);
///
/// let alpha = choose_step_size(&mut f, &mut df, &[5.0], &[-10.0], LineSearch::Exact)
///     .expect("descent direction");
/// assert!((alpha - 0.5).abs() < 1e-9);
///
/// // Uphill directions are refused.
/// assert!(choose_step_size(&mut f, &mut df, &[5.0], &[1.0], LineSearch::Exact).is_none());
/// ```
pub fn choose_step_size<T, F, G>(
    objective: &mut Counted<F>,
    gradient: &mut Counted<G>,
    x: &[T],
    p: &[T],
    method: LineSearch,
) -> Option<T>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let value = objective.apply(x);
    let grad = gradient.apply(x);
    let mut line = Line::new(objective, gradient, x, p);
    search(&mut line, value, grad, method).map(|step| step.alpha)
}

/// Runs a line search from a point whose value and gradient are already known.
pub(crate) fn search<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    value: T,
    gradient: Vec<T>,
    method: LineSearch,
) -> Option<Step<T>>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let mut origin = Sample {
        alpha: T::zero(),
        value,
        gradient: Some(gradient),
    };
    let slope = line.slope(&mut origin);
    if !(slope < T::zero()) {
        trace!("direction is not a descent direction (slope {:?})", slope);
        return None;
    }

    let bracket = bracket::find(line, origin)?;
    let Sample {
        alpha,
        value,
        gradient,
    } = match method {
        LineSearch::CubicInterpolation => refine_cubic(line, bracket, slope),
        LineSearch::Exact => refine_exact(line, bracket, value),
    };
    trace!("accepted step {:?} with value {:?}", alpha, value);

    Some(Step {
        alpha,
        value,
        gradient,
    })
}

fn refinement_tolerance<T: Float>() -> T {
    constant::<T>(EXACT_TOLERANCE).max(T::epsilon() * constant(4.0))
}

/// Golden-section search on the bracket, finished by bisection on the slope.
///
/// Values stop telling steps apart once they agree to rounding; from there the
/// sign of `φ'` still locates the minimizer, so the flat bracket is bisected on it.
fn refine_exact<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    mut bracket: Bracket<T>,
    initial_value: T,
) -> Sample<T>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let tolerance = refinement_tolerance();
    let fraction = constant::<T>(GOLDEN_FRACTION);

    for _ in 0..MAX_REFINEMENTS {
        if bracket.is_collapsed(tolerance) || bracket.is_flat(flat_allowance(bracket.mid.value)) {
            break;
        }
        let [lower, mid, upper] = bracket.as_array();
        let alpha = if upper - mid > mid - lower {
            mid + fraction * (upper - mid)
        } else {
            mid - fraction * (mid - lower)
        };
        let trial = line.sample(alpha);
        // Ties and rounding onto the midpoint mean the values can no longer discriminate.
        if bracket.shrink(trial).is_err() {
            break;
        }
    }

    let Some((alpha, gradient)) = bisect_slope(line, &bracket, tolerance) else {
        return bracket.mid;
    };
    let mut polished = line.sample(alpha);
    if polished.value < initial_value
        && polished.value <= bracket.mid.value + flat_allowance(bracket.mid.value)
    {
        polished.gradient = Some(gradient);
        polished
    } else {
        bracket.mid
    }
}

/// Rounding slack allowed between values that should be equal.
fn flat_allowance<T: Float>(value: T) -> T {
    T::epsilon() * constant(FLAT_ULPS) * value.abs()
}

/// Bisects `[lower, upper]` on the sign of `φ'`, returning the last probe and its gradient.
fn bisect_slope<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    bracket: &Bracket<T>,
    tolerance: T,
) -> Option<(T, Vec<T>)>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let [mut lo, _, mut hi] = bracket.as_array();
    let half = constant::<T>(0.5);
    let mut probe = None;

    for _ in 0..MAX_REFINEMENTS {
        if hi - lo <= tolerance * hi {
            break;
        }
        let alpha = (lo + hi) * half;
        if !(lo < alpha && alpha < hi) {
            break;
        }
        let gradient = line.gradient_at(alpha);
        let slope = dot(&gradient, line.direction);
        if slope.is_nan() {
            break;
        }
        probe = Some((alpha, gradient));
        if slope < T::zero() {
            lo = alpha;
        } else if slope > T::zero() {
            hi = alpha;
        } else {
            break;
        }
    }
    probe
}

/// Safeguarded cubic interpolation on the half of the bracket where `φ` still descends.
fn refine_cubic<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    mut bracket: Bracket<T>,
    initial_slope: T,
) -> Sample<T>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let tolerance = refinement_tolerance();
    let target = initial_slope.abs() * constant(CUBIC_SLOPE_RATIO);
    let safeguard = constant::<T>(CUBIC_SAFEGUARD);

    for _ in 0..MAX_REFINEMENTS {
        let mid_slope = line.slope(&mut bracket.mid);
        if !(mid_slope.abs() > target) || bracket.is_collapsed(tolerance) {
            break;
        }

        let (a, b) = if mid_slope < T::zero() {
            (&mut bracket.mid, &mut bracket.upper)
        } else {
            (&mut bracket.lower, &mut bracket.mid)
        };
        let slope_a = line.slope(a);
        let slope_b = line.slope(b);
        let width = b.alpha - a.alpha;
        let alpha = match cubic_minimizer(a.alpha, a.value, slope_a, b.alpha, b.value, slope_b) {
            Some(alpha) => alpha
                .max(a.alpha + safeguard * width)
                .min(b.alpha - safeguard * width),
            None => {
                trace!("degenerate cubic on [{:?}, {:?}], bisecting", a.alpha, b.alpha);
                (a.alpha + b.alpha) * constant(0.5)
            }
        };

        let trial = line.sample(alpha);
        if bracket.shrink(trial).is_err() {
            break;
        }
    }
    bracket.mid
}

/// Minimizer of the cubic Hermite interpolant through `(a, φ(a), φ'(a))` and `(b, φ(b), φ'(b))`.
///
/// Returns `None` when the fit has no real minimizer, its denominator vanishes,
/// or the minimizer falls outside `(a, b)`.
pub(crate) fn cubic_minimizer<T: Float>(
    a: T,
    value_a: T,
    slope_a: T,
    b: T,
    value_b: T,
    slope_b: T,
) -> Option<T> {
    let d1 = slope_a + slope_b - constant::<T>(3.0) * (value_a - value_b) / (a - b);
    let discriminant = d1 * d1 - slope_a * slope_b;
    if !(discriminant >= T::zero()) {
        return None;
    }
    let d2 = (b - a).signum() * discriminant.sqrt();
    let denominator = slope_b - slope_a + constant::<T>(2.0) * d2;
    if !(denominator.abs() > T::epsilon() * (slope_a.abs() + slope_b.abs() + d2.abs())) {
        return None;
    }
    let alpha = b - (b - a) * (slope_b + d2 - d1) / denominator;
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (lo < alpha && alpha < hi).then_some(alpha)
}
