//! Online parameter estimates shared across the adaptive loop.

use mrac_core::Real;
use serde::{Deserialize, Serialize};

/// Online estimates of the unknown plant parameters.
///
/// The scheduler owns one instance per run and threads it through every
/// tick; only [`crate::AdaptationLaw::update`] mutates it, exactly once per
/// tick, strictly after that tick's control has been computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterEstimate {
    /// Estimate of the nonlinearity coefficient `a`.
    pub a_hat: Real,
    /// Estimate of the input gain `b`.
    pub b_hat: Real,
}

impl ParameterEstimate {
    /// Create an estimate pair from initial guesses.
    pub fn new(a_hat: Real, b_hat: Real) -> Self {
        Self { a_hat, b_hat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_creation() {
        let est = ParameterEstimate::new(0.1, 0.5);
        assert_eq!(est.a_hat, 0.1);
        assert_eq!(est.b_hat, 0.5);
    }
}
