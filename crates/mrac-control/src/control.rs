//! Feedback-linearizing control law with a divide-guard degeneracy.

use crate::error::{ControlError, ControlResult};
use crate::estimate::ParameterEstimate;
use mrac_core::Real;
use serde::{Deserialize, Serialize};

/// Feedback-linearizing control law configuration.
///
/// For a plant `ẏ = -a·φ(y) + b·u + d` the law
///
/// ```text
/// u = (k_r·r(t) - â·φ(y)) / b̂     if |b̂| >= epsilon
/// u = 0                            if |b̂| <  epsilon
/// ```
///
/// cancels the estimated nonlinearity and scales the reference so that, at
/// exact estimates, the closed loop reduces to the reference model. The
/// basis value `φ(y)` is supplied by the caller (the plant defines its own
/// basis), so any algebraically-cancellable nonlinearity plugs in.
///
/// `k_r` is a plain configuration constant. The nominal design picks
/// `k_r = br / b_true`, which leans on the true plant gain; that choice is
/// the scenario author's compromise, not something this law derives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLaw {
    /// Feedforward scaling on the reference signal.
    pub k_r: Real,
    /// Guard threshold below which `|b̂|` is treated as degenerate.
    pub epsilon: Real,
}

/// Default divide-guard threshold.
pub const DEFAULT_EPSILON: Real = 1e-6;

/// Control output for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlDecision {
    /// Control input, held constant over the tick (zero-order hold).
    pub u: Real,
    /// True when the guard forced the safe fallback `u = 0`.
    pub degenerate: bool,
}

impl ControlLaw {
    /// Create a new control law.
    ///
    /// # Arguments
    ///
    /// * `k_r` - Feedforward scaling (must be finite)
    /// * `epsilon` - Divide-guard threshold (must be positive)
    pub fn new(k_r: Real, epsilon: Real) -> ControlResult<Self> {
        if !k_r.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "k_r must be finite",
            });
        }
        if !(epsilon > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "epsilon must be positive",
            });
        }
        Ok(Self { k_r, epsilon })
    }

    /// Compute the control for the current tick.
    ///
    /// # Arguments
    ///
    /// * `basis` - Plant nonlinearity basis evaluated at the current
    ///   output, e.g. `y³` for the cubic benchmark plant
    /// * `est` - Parameter estimates as they stand at tick start
    /// * `r` - Reference signal value at the current time
    ///
    /// The guard fallback is a defined degeneracy, not an error: a
    /// collapsed input-gain estimate yields zero actuation instead of an
    /// unbounded control.
    pub fn control(&self, basis: Real, est: &ParameterEstimate, r: Real) -> ControlDecision {
        if est.b_hat.abs() < self.epsilon {
            return ControlDecision {
                u: 0.0,
                degenerate: true,
            };
        }
        ControlDecision {
            u: (self.k_r * r - est.a_hat * basis) / est.b_hat,
            degenerate: false,
        }
    }
}
