use std::fmt::Debug;

use log::warn;
use num_traits::Float;

use super::conjugate_gradient::fletcher_reeves;
use super::gradient_descent::steepest_descent;
use super::vector::dot;

/// The rule producing each search direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// `p = -∇f(x)`.
    #[default]
    SteepestDescent,
    /// Fletcher-Reeves nonlinear conjugate gradient.
    ConjugateGradient,
}

/// State a direction rule hands from one iteration to the next.
///
/// Steepest descent never leaves anything behind; conjugate gradient keeps
/// the gradient and direction it used last.
#[derive(Debug, Clone, PartialEq)]
pub enum Memory<T> {
    Fresh,
    Previous { gradient: Vec<T>, direction: Vec<T> },
}

impl Algorithm {
    /// Computes the search direction at a point with the given gradient.
    ///
    /// Returns the direction together with the memory for the next call, or
    /// `None` when the remembered gradient is zero: the previous point was
    /// already stationary and there is nothing left to search for.
    ///
    /// # Examples
    ///
    /// ```
    /// use descent::math::optimization::{Algorithm, Memory};
    ///
    /// let (p0, memory) = Algorithm::ConjugateGradient
    ///     .next_direction(&[2.0, 0.0], Memory::Fresh)
    ///     .unwrap();
    /// assert_eq!(p0, vec![-2.0, 0.0]);
    ///
    /// // β = |g1|² / |g0|² = 0.25
    /// let (p1, _) = Algorithm::ConjugateGradient
    ///     .next_direction(&[0.0, 1.0], memory)
    ///     .unwrap();
    /// assert_eq!(p1, vec![-0.5, -1.0]);
    /// ```
    pub fn next_direction<T>(self, gradient: &[T], memory: Memory<T>) -> Option<(Vec<T>, Memory<T>)>
    where
        T: Float + Debug,
    {
        match self {
            Algorithm::SteepestDescent => Some((steepest_descent(gradient), Memory::Fresh)),
            Algorithm::ConjugateGradient => {
                let direction = match memory {
                    Memory::Fresh => steepest_descent(gradient),
                    Memory::Previous {
                        gradient: previous_gradient,
                        direction: previous_direction,
                    } => {
                        let direction =
                            fletcher_reeves(&previous_gradient, &previous_direction, gradient)?;
                        if dot(gradient, &direction) < T::zero() {
                            direction
                        } else {
                            warn!("conjugate direction does not descend, restarting from steepest descent");
                            steepest_descent(gradient)
                        }
                    }
                };
                let memory = Memory::Previous {
                    gradient: gradient.to_vec(),
                    direction: direction.clone(),
                };
                Some((direction, memory))
            }
        }
    }
}
