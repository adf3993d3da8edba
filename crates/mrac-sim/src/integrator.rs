//! Fixed-step time integrators behind a single-step contract.
//!
//! The loop depends only on `step(rhs, t, dt, state) -> next_state`; the
//! method inside (RK4, Euler, ...) is interchangeable as long as it
//! preserves state dimensionality.

use crate::error::SimResult;
use mrac_core::Real;

/// One-step ODE system as seen by an integrator.
///
/// Mirrors the `Plant` arithmetic so the same integrator advances both the
/// plant (with its control input held) and the reference model.
pub trait OdeSystem {
    /// State type (must be Clone).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes &mut self to allow systems to cache intermediate work.
    fn rhs(&mut self, t: Real, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = k * a.
    fn scale(&self, a: &Self::State, k: Real) -> Self::State;
}

/// Trait for single-step time integrators.
pub trait Integrator {
    /// Advance state by one time step over `[t, t+dt]`.
    fn step<M: OdeSystem>(
        &self,
        system: &mut M,
        t: Real,
        x: &M::State,
        dt: Real,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn step<M: OdeSystem>(
        &self,
        system: &mut M,
        t: Real,
        x: &M::State,
        dt: Real,
    ) -> SimResult<M::State> {
        let half = 0.5 * dt;

        let k1 = system.rhs(t, x)?;
        let x2 = system.add(x, &system.scale(&k1, half));
        let k2 = system.rhs(t + half, &x2)?;
        let x3 = system.add(x, &system.scale(&k2, half));
        let k3 = system.rhs(t + half, &x3)?;
        let x4 = system.add(x, &system.scale(&k3, dt));
        let k4 = system.rhs(t + dt, &x4)?;

        // x_new = x + (dt/6)·(k1 + 2k2 + 2k3 + k4)
        let mid = system.add(&system.scale(&k2, 2.0), &system.scale(&k3, 2.0));
        let k_sum = system.add(&system.add(&k1, &mid), &k4);
        Ok(system.add(x, &system.scale(&k_sum, dt / 6.0)))
    }
}

/// Forward Euler (explicit, 1st order, one rhs call per step).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: OdeSystem>(
        &self,
        system: &mut M,
        t: Real,
        x: &M::State,
        dt: Real,
    ) -> SimResult<M::State> {
        let xdot = system.rhs(t, x)?;
        Ok(system.add(x, &system.scale(&xdot, dt)))
    }
}
