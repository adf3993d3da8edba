//! Scenario configuration for benchmark runs.
//!
//! The recognized surface covers the loop configuration
//! (`a_hat0, b_hat0, gamma_a, gamma_b, k_r, epsilon, dt, horizon`), the
//! benchmark plant truth values, the reference model, initial conditions,
//! and the reference signal. Defaults reproduce the nominal cubic-plant
//! scenario.

use crate::error::SimResult;
use crate::plant::CubicPlant;
use crate::sim::{IntegratorType, LoopOptions, LoopSetup};
use mrac_core::Real;
use mrac_control::{
    AdaptationLaw, ControlLaw, DEFAULT_EPSILON, ParameterEstimate, ReferenceModel, ReferenceSignal,
};
use serde::{Deserialize, Serialize};

/// Full configuration of one adaptive-loop run against the cubic
/// benchmark plant.
///
/// Note on `k_r`: the nominal design picks `k_r = br / b_true`, which
/// leans on the supposedly-unknown true gain. The value is carried here as
/// a plain constant so the compromise is visible in the scenario file
/// rather than baked into the control law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// True nonlinearity coefficient of the benchmark plant.
    pub a_true: Real,
    /// True input gain of the benchmark plant.
    pub b_true: Real,
    /// Constant disturbance on the benchmark plant.
    pub d_true: Real,

    /// Reference-model pole.
    pub ar: Real,
    /// Reference-model input gain.
    pub br: Real,

    /// Initial plant output.
    pub y0: Real,
    /// Initial reference-model output.
    pub yr0: Real,

    /// Initial estimate of `a`.
    pub a_hat0: Real,
    /// Initial estimate of `b`.
    pub b_hat0: Real,
    /// Adaptation gain on `â`.
    pub gamma_a: Real,
    /// Adaptation gain on `b̂`.
    pub gamma_b: Real,

    /// Feedforward scaling.
    pub k_r: Real,
    /// Divide-guard threshold.
    pub epsilon: Real,

    /// Fixed tick size (seconds).
    pub dt: Real,
    /// Total simulated time (seconds).
    pub horizon: Real,

    /// Reference signal `r(t)`.
    pub signal: ReferenceSignal,
    /// Integrator selection.
    pub integrator: IntegratorType,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            a_true: 1.5,
            b_true: 2.0,
            d_true: 0.5,
            ar: 3.0,
            br: 3.0,
            y0: 0.1,
            yr0: 0.0,
            a_hat0: 0.1,
            b_hat0: 0.5,
            gamma_a: 0.1,
            gamma_b: 0.2,
            k_r: 1.5,
            epsilon: DEFAULT_EPSILON,
            dt: 0.01,
            horizon: 10.0,
            signal: ReferenceSignal::unit_sine(),
            integrator: IntegratorType::Rk4,
        }
    }
}

impl ScenarioConfig {
    /// Validate the configuration and build the plant, loop setup, and
    /// options. Rejects bad gains, guards, and clock settings before any
    /// tick runs.
    pub fn build(&self) -> SimResult<(CubicPlant, LoopSetup, LoopOptions)> {
        let reference = ReferenceModel::new(self.ar, self.br)?;
        let control = ControlLaw::new(self.k_r, self.epsilon)?;
        let adaptation = AdaptationLaw::new(self.gamma_a, self.gamma_b)?;

        let setup = LoopSetup {
            reference,
            control,
            adaptation,
            estimate: ParameterEstimate::new(self.a_hat0, self.b_hat0),
            yr0: self.yr0,
        };
        let opts = LoopOptions {
            dt: self.dt,
            horizon: self.horizon,
            integrator: self.integrator,
            ..LoopOptions::default()
        };
        opts.validate()?;

        Ok((CubicPlant::new(self.a_true, self.b_true, self.d_true), setup, opts))
    }
}
