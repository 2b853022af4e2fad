//! Derivative-based descent methods for unconstrained minimization.
//!
//! Steepest descent and Fletcher-Reeves conjugate gradient share one driver
//! that pulls iterates lazily from an unbounded stream and stops on a gradient
//! tolerance or a step budget. Step lengths come from a bracketing line search
//! refined by cubic interpolation or an exact search.

pub mod error;
pub mod math;

pub use error::{Error, Result};
pub use math::optimization::{
    choose_step_size, conjugate_gradient_minimize, gradient_descent_minimize, Algorithm, Counted,
    Diagnostics, Evaluations, Iterate, Iterates, LineSearch, ObjectiveFunction,
    OptimizationConfig, OptimizationResult, Optimizer, Termination,
};
