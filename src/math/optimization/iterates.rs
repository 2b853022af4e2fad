use std::fmt::Debug;

use log::debug;
use num_traits::Float;

use super::counted::{Evaluations, Problem};
use super::direction::{Algorithm, Memory};
use super::line_search::{self, LineSearch};
use super::vector::{norm, step};

/// One point of a descent run, in the order it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Iterate<T> {
    pub point: Vec<T>,
    pub value: T,
    pub gradient_norm: T,
}

/// Why an [`Iterates`] stream ended by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The line search found no step along the last direction.
    StepSearchFailed,
    /// The conjugate-gradient update met a zero previous gradient.
    Stationary,
}

/// Everything needed to take the step after the last emitted iterate.
struct Cursor<T> {
    point: Vec<T>,
    value: T,
    gradient: Vec<T>,
    memory: Memory<T>,
}

impl<T: Float> Cursor<T> {
    fn record(&self) -> Iterate<T> {
        Iterate {
            point: self.point.clone(),
            value: self.value,
            gradient_norm: norm(&self.gradient),
        }
    }
}

/// The unbounded sequence of iterates of a descent method.
///
/// Nothing is evaluated until the first call to [`next`](Iterator::next), and
/// each call does exactly the work for one more iterate: the initial point's
/// value and gradient first, then one direction update, one line search and
/// the gradient at the accepted point. The stream never stops on its own
/// while steps can be found; callers decide when to stop pulling.
pub struct Iterates<T, F, G> {
    problem: Problem<F, G>,
    algorithm: Algorithm,
    line_search: LineSearch,
    pending: Option<Vec<T>>,
    cursor: Option<Cursor<T>>,
    halt: Option<Halt>,
    emitted: usize,
}

impl<T, F, G> Iterates<T, F, G>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    pub(crate) fn new(
        objective: F,
        gradient: G,
        initial_point: Vec<T>,
        algorithm: Algorithm,
        line_search: LineSearch,
    ) -> Self {
        Self {
            problem: Problem::new(objective, gradient),
            algorithm,
            line_search,
            pending: Some(initial_point),
            cursor: None,
            halt: None,
            emitted: 0,
        }
    }

    /// Evaluations consumed so far.
    #[must_use]
    pub fn evaluations(&self) -> Evaluations {
        self.problem.evaluations()
    }

    /// Why the stream ended, if it has.
    #[must_use]
    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    fn start(&mut self, point: Vec<T>) -> Cursor<T> {
        let value = self.problem.value(&point);
        let gradient = self.problem.gradient(&point);
        Cursor {
            point,
            value,
            gradient,
            memory: Memory::Fresh,
        }
    }

    fn advance(&mut self, cursor: Cursor<T>) -> Result<Cursor<T>, Halt> {
        let Cursor {
            point,
            value,
            gradient,
            memory,
        } = cursor;

        let (direction, memory) = self
            .algorithm
            .next_direction(&gradient, memory)
            .ok_or(Halt::Stationary)?;

        let mut line = self.problem.line(&point, &direction);
        let accepted = line_search::search(&mut line, value, gradient, self.line_search)
            .ok_or(Halt::StepSearchFailed)?;

        let next_point = step(&point, accepted.alpha, &direction);
        let next_gradient = match accepted.gradient {
            Some(gradient) => gradient,
            None => self.problem.gradient(&next_point),
        };
        Ok(Cursor {
            point: next_point,
            value: accepted.value,
            gradient: next_gradient,
            memory,
        })
    }
}

impl<T, F, G> Iterator for Iterates<T, F, G>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
    type Item = Iterate<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = match self.pending.take() {
            Some(point) => self.start(point),
            None => {
                let cursor = self.cursor.take()?;
                match self.advance(cursor) {
                    Ok(cursor) => cursor,
                    Err(halt) => {
                        debug!("iterates halted after {} points: {:?}", self.emitted, halt);
                        self.halt = Some(halt);
                        return None;
                    }
                }
            }
        };

        let iterate = cursor.record();
        debug!(
            "iterate {}: value {:?}, gradient norm {:?}",
            self.emitted, iterate.value, iterate.gradient_norm
        );
        self.cursor = Some(cursor);
        self.emitted += 1;
        Some(iterate)
    }
}

impl<T, F, G> std::iter::FusedIterator for Iterates<T, F, G>
where
    T: Float + Debug,
    F: Fn(&[T]) -> T,
    G: Fn(&[T]) -> Vec<T>,
{
}
