pub mod optimization;

pub use optimization::{
    conjugate_gradient_minimize, gradient_descent_minimize, ObjectiveFunction,
    OptimizationConfig, OptimizationResult, Optimizer,
};
