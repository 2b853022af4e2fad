use std::fmt::Debug;

use log::trace;
use num_traits::Float;
use thiserror::Error;

use super::line_search::Line;
use super::vector::{constant, norm};

/// Factor applied to the step while the restriction keeps decreasing.
const GROWTH: f64 = 2.0;

/// Factor applied to the step while the restriction has not decreased yet.
const CONTRACTION: f64 = 0.5;

/// Errors that can occur when creating or shrinking a [`Bracket`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BracketError {
    /// Step lengths are not ordered `lower < mid < upper`.
    #[error("step lengths are not ordered")]
    Unordered,
    /// The midpoint is not strictly below both ends.
    #[error("midpoint does not lie below both ends")]
    NoDip,
    /// A trial step is outside the bracket or coincides with its midpoint.
    #[error("trial step is not strictly inside the bracket")]
    Outside,
    /// A trial step has the same value as the midpoint.
    #[error("trial value ties the midpoint value")]
    Tie,
}

/// One evaluation of the restriction `φ(α) = f(x + α·p)`.
///
/// The gradient at `x + α·p` is filled in only when a slope is requested.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sample<T> {
    pub(crate) alpha: T,
    pub(crate) value: T,
    pub(crate) gradient: Option<Vec<T>>,
}

impl<T> Sample<T> {
    pub(crate) fn new(alpha: T, value: T) -> Self {
        Self {
            alpha,
            value,
            gradient: None,
        }
    }
}

/// Three step lengths `lower < mid < upper` with `φ(mid)` strictly below
/// `φ(lower)` and `φ(upper)`, so a local minimum of `φ` lies in `(lower, upper)`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bracket<T> {
    pub(super) lower: Sample<T>,
    pub(super) mid: Sample<T>,
    pub(super) upper: Sample<T>,
}

impl<T: Float> Bracket<T> {
    /// Creates a bracket after checking ordering and the dip at `mid`.
    ///
    /// Comparisons are strict, so a NaN anywhere is rejected.
    pub(crate) fn new(
        lower: Sample<T>,
        mid: Sample<T>,
        upper: Sample<T>,
    ) -> Result<Self, BracketError> {
        if !(lower.alpha < mid.alpha && mid.alpha < upper.alpha) {
            return Err(BracketError::Unordered);
        }
        if !(mid.value < lower.value && mid.value < upper.value) {
            return Err(BracketError::NoDip);
        }
        Ok(Self { lower, mid, upper })
    }

    #[must_use]
    pub(crate) fn as_array(&self) -> [T; 3] {
        [self.lower.alpha, self.mid.alpha, self.upper.alpha]
    }

    #[must_use]
    pub(crate) fn width(&self) -> T {
        self.upper.alpha - self.lower.alpha
    }

    /// Returns true once the bracket is no wider than `tolerance` relative to its midpoint.
    ///
    /// Step lengths are positive, so the width is measured against `mid` alone.
    #[must_use]
    pub(crate) fn is_collapsed(&self, tolerance: T) -> bool {
        self.width() <= tolerance * self.mid.alpha.abs()
    }

    /// Returns true when neither end rises more than `allowance` above the midpoint.
    #[must_use]
    pub(crate) fn is_flat(&self, allowance: T) -> bool {
        self.lower.value - self.mid.value <= allowance
            && self.upper.value - self.mid.value <= allowance
    }

    /// Replaces one end (or the midpoint) with `trial`, keeping the bracket valid.
    ///
    /// On error the bracket is left untouched.
    #[allow(clippy::float_cmp)]
    pub(crate) fn shrink(&mut self, trial: Sample<T>) -> Result<(), BracketError> {
        if !(self.lower.alpha < trial.alpha && trial.alpha < self.upper.alpha)
            || trial.alpha == self.mid.alpha
        {
            return Err(BracketError::Outside);
        }

        let above_mid = trial.alpha > self.mid.alpha;
        if trial.value < self.mid.value {
            let old_mid = std::mem::replace(&mut self.mid, trial);
            if above_mid {
                self.lower = old_mid;
            } else {
                self.upper = old_mid;
            }
        } else if trial.value > self.mid.value {
            if above_mid {
                self.upper = trial;
            } else {
                self.lower = trial;
            }
        } else {
            return Err(BracketError::Tie);
        }
        Ok(())
    }
}

/// Brackets a minimum of `φ` along the line, starting from `origin` (α = 0).
///
/// The first probe moves a unit distance in `x`, so `α₀ = 1/‖p‖`. Probes then
/// double or halve until the step overflows or underflows. The caller has
/// already checked that the line descends from `origin`. Returns `None` when
/// no bracket is found, which includes objectives that keep decreasing (or
/// turn non-finite) along the line.
pub(crate) fn find<T, F, G>(line: &mut Line<'_, T, F, G>, origin: Sample<T>) -> Option<Bracket<T>>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let initial = norm(line.direction()).recip();
    if !(initial.is_finite() && initial > T::zero()) {
        trace!("direction norm gives no usable first step");
        return None;
    }
    let first = line.sample(initial);
    let bracket = if first.value < origin.value {
        expand(line, origin, first)
    } else {
        contract(line, origin, first)
    };

    match &bracket {
        Some(bracket) => trace!("bracketed minimum at {:?}", bracket.as_array()),
        None => trace!("no bracket along the search direction"),
    }
    bracket
}

/// Walks outwards until the restriction turns back up.
fn expand<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    mut lower: Sample<T>,
    mut mid: Sample<T>,
) -> Option<Bracket<T>>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let growth = constant::<T>(GROWTH);
    loop {
        let alpha = mid.alpha * growth;
        if !alpha.is_finite() {
            return None;
        }
        let upper = line.sample(alpha);
        if upper.value > mid.value {
            return Bracket::new(lower, mid, upper).ok();
        }
        if !(upper.value < mid.value) {
            return split_plateau(line, lower, mid, upper);
        }
        lower = std::mem::replace(&mut mid, upper);
    }
}

/// Pulls the trial step back towards the origin until it drops below `φ(0)`.
fn contract<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    lower: Sample<T>,
    mut upper: Sample<T>,
) -> Option<Bracket<T>>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    let contraction = constant::<T>(CONTRACTION);
    loop {
        let alpha = upper.alpha * contraction;
        if !(alpha > T::zero()) {
            return None;
        }
        let mid = line.sample(alpha);
        if mid.value < lower.value {
            return Bracket::new(lower, mid, upper).ok();
        }
        upper = mid;
    }
}

/// Resolves `φ(mid) == φ(upper)` by probing once between the two.
fn split_plateau<T, F, G>(
    line: &mut Line<'_, T, F, G>,
    lower: Sample<T>,
    mid: Sample<T>,
    upper: Sample<T>,
) -> Option<Bracket<T>>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    if upper.value.is_nan() {
        return None;
    }
    let probe = line.sample((mid.alpha + upper.alpha) * constant(0.5));
    if probe.value < mid.value {
        Bracket::new(mid, probe, upper).ok()
    } else {
        Bracket::new(lower, mid, probe).ok()
    }
}
