//! First-order stable reference model defining the desired trajectory.

use crate::error::{ControlError, ControlResult};
use mrac_core::Real;
use serde::{Deserialize, Serialize};

/// Reference model `ẏr = -ar·yr + br·r(t)`.
///
/// Encodes the *desired* closed-loop dynamics, chosen by the designer and
/// fixed at configuration time. Stable by construction for `ar > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceModel {
    /// Pole of the desired dynamics.
    pub ar: Real,
    /// Gain on the external reference signal.
    pub br: Real,
}

impl ReferenceModel {
    /// Create a new reference model.
    ///
    /// # Arguments
    ///
    /// * `ar` - Desired pole (must be positive; this is what makes the
    ///   model stable)
    /// * `br` - Reference input gain (must be positive)
    pub fn new(ar: Real, br: Real) -> ControlResult<Self> {
        if !(ar > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "ar must be positive",
            });
        }
        if !(br > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "br must be positive",
            });
        }
        Ok(Self { ar, br })
    }

    /// Rate of change of the reference state: `ẏr = -ar·yr + br·r`.
    ///
    /// Pure function of its inputs; the scheduler integrates it with the
    /// same step integrator used for the plant.
    pub fn rate(&self, yr: Real, r: Real) -> Real {
        -self.ar * yr + self.br * r
    }
}
