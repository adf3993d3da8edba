//! Gradient (MIT-rule) parameter adaptation.

use crate::error::{ControlError, ControlResult};
use crate::estimate::ParameterEstimate;
use mrac_core::Real;
use serde::{Deserialize, Serialize};

/// Gradient adaptation law with per-parameter gains.
///
/// One tick applies an Euler step of the MIT-rule gradient flow,
/// descending the instantaneous squared tracking error `e = yr - y`:
///
/// ```text
/// â ← â − γ_a · e · φ(y) · dt
/// b̂ ← b̂ − γ_b · e · u · dt
/// ```
///
/// The regressors are the sensitivities of the error to each parameter up
/// to a positive factor: raising `â` adds damping and raises `e` through
/// `φ(y)`, raising `b̂` shrinks the applied control and moves `e` through
/// `u`, so both updates step against the error gradient. This rule
/// carries no Lyapunov certificate; bounded-error behavior is empirical
/// and covered by the statistical regression tests in `mrac-sim`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptationLaw {
    /// Gain on the nonlinearity-coefficient estimate.
    pub gamma_a: Real,
    /// Gain on the input-gain estimate.
    pub gamma_b: Real,
}

impl AdaptationLaw {
    /// Create a new adaptation law.
    ///
    /// Both gains must be strictly positive: a zero gain disables learning
    /// and a negative gain inverts it, so both are rejected here rather
    /// than discovered mid-run.
    pub fn new(gamma_a: Real, gamma_b: Real) -> ControlResult<Self> {
        if !(gamma_a > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "gamma_a must be positive",
            });
        }
        if !(gamma_b > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "gamma_b must be positive",
            });
        }
        Ok(Self { gamma_a, gamma_b })
    }

    /// Apply one gradient step in place.
    ///
    /// # Arguments
    ///
    /// * `est` - Estimates to update (sole mutation point in the loop)
    /// * `e` - Tracking error `yr - y` measured at tick start
    /// * `basis` - Nonlinearity basis `φ(y)` at the current output
    /// * `u` - The control actually applied this tick
    /// * `dt` - Tick length the gradient flow is integrated over
    ///
    /// Always well-defined; applied unconditionally once per tick.
    pub fn update(&self, est: &mut ParameterEstimate, e: Real, basis: Real, u: Real, dt: Real) {
        est.a_hat -= self.gamma_a * e * basis * dt;
        est.b_hat -= self.gamma_b * e * u * dt;
    }
}
