//! Configurable reference-signal sources.
//!
//! The loop itself only requires an `Fn(f64) -> f64`; this enum provides
//! the serde-loadable sources the harness exposes in scenario files.

use mrac_core::Real;
use serde::{Deserialize, Serialize};

/// Reference signal `r(t)` driving both the reference model and the
/// control law's feedforward term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceSignal {
    /// Constant setpoint.
    Constant { value: Real },
    /// Sinusoid `amplitude · sin(omega·t + phase)`.
    Sine {
        amplitude: Real,
        omega: Real,
        #[serde(default)]
        phase: Real,
    },
    /// Step from 0 to `value` at time `at`.
    Step { value: Real, at: Real },
}

impl ReferenceSignal {
    /// Unit sinusoid `sin(t)`, the nominal benchmark signal.
    pub fn unit_sine() -> Self {
        Self::Sine {
            amplitude: 1.0,
            omega: 1.0,
            phase: 0.0,
        }
    }

    /// Evaluate the signal at time `t`.
    pub fn eval(&self, t: Real) -> Real {
        match *self {
            Self::Constant { value } => value,
            Self::Sine {
                amplitude,
                omega,
                phase,
            } => amplitude * (omega * t + phase).sin(),
            Self::Step { value, at } => {
                if t >= at {
                    value
                } else {
                    0.0
                }
            }
        }
    }
}

impl Default for ReferenceSignal {
    fn default() -> Self {
        Self::unit_sine()
    }
}
