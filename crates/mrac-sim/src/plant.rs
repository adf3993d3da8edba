//! Plant-side contract and the nominal cubic benchmark plant.

use crate::error::SimResult;
use mrac_core::Real;

/// System under adaptive control.
///
/// The loop treats the plant as an opaque collaborator: it injects the
/// control `u`, reads the scalar output `y`, and advances the dynamics
/// through the step integrator. The plant never learns about estimates or
/// the reference model, and the loop never mutates plant state directly.
///
/// `add`/`scale` provide the state arithmetic the integrator needs without
/// the loop knowing the state's shape.
pub trait Plant {
    /// State type (must be Clone for snapshots).
    type State: Clone;

    /// State derivative `ẋ = f(t, x, u)` with `u` held constant over the
    /// step (zero-order hold).
    fn rhs(&mut self, t: Real, x: &Self::State, u: Real) -> SimResult<Self::State>;

    /// Scalar output `y` used for tracking (the controlled variable).
    fn output(&self, x: &Self::State) -> Real;

    /// Nonlinearity basis `φ(y)` the control law cancels, e.g. `y³`.
    fn basis(&self, y: Real) -> Real;

    /// True when every entry of the state is finite.
    fn state_finite(&self, x: &Self::State) -> bool;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = k * a.
    fn scale(&self, a: &Self::State, k: Real) -> Self::State;
}

/// Nominal benchmark plant `ẏ = -a·y³ + b·u + d`.
///
/// Cubic damping with unknown coefficient, unknown input gain, and a
/// constant disturbance. The true values live here so tests and the
/// harness can simulate it; the loop itself only ever sees the trait.
#[derive(Clone, Debug)]
pub struct CubicPlant {
    /// True nonlinearity coefficient.
    pub a: Real,
    /// True input gain.
    pub b: Real,
    /// Constant disturbance.
    pub d: Real,
}

impl CubicPlant {
    pub fn new(a: Real, b: Real, d: Real) -> Self {
        Self { a, b, d }
    }
}

impl Plant for CubicPlant {
    type State = Real;

    fn rhs(&mut self, _t: Real, y: &Real, u: Real) -> SimResult<Real> {
        Ok(-self.a * y.powi(3) + self.b * u + self.d)
    }

    fn output(&self, y: &Real) -> Real {
        *y
    }

    fn basis(&self, y: Real) -> Real {
        y.powi(3)
    }

    fn state_finite(&self, y: &Real) -> bool {
        y.is_finite()
    }

    fn add(&self, a: &Real, b: &Real) -> Real {
        a + b
    }

    fn scale(&self, a: &Real, k: Real) -> Real {
        a * k
    }
}
