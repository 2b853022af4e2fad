use thiserror::Error;

/// Errors raised by the optimization toolkit.
///
/// Running out of steps, failing to find a step and hitting a stationary
/// point are ordinary outcomes reported through
/// [`Termination`](crate::math::optimization::Termination), not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("dimension mismatch: expected a {expected}-dimensional point, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = Error::DimensionMismatch {
            expected: 1,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected a 1-dimensional point, found 3"
        );

        let err = Error::InvalidConfig {
            reason: "max_steps must be positive",
        };
        assert_eq!(err.to_string(), "invalid config: max_steps must be positive");
    }
}
