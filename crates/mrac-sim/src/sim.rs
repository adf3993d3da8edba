//! Adaptive loop scheduler: one control-adapt-integrate cycle per tick.
//!
//! Tick ordering is a hard invariant, not a scheduling choice:
//! 1) evaluate the control law from the tick-start state and estimate
//! 2) apply the adaptation update with that same control and the
//!    tick-start tracking error
//! 3) advance the plant one step, control held constant (zero-order hold)
//! 4) advance the reference model through the same integrator abstraction
//! 5) advance the clock

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, OdeSystem, Rk4};
use crate::plant::Plant;
use mrac_core::{Real, ensure_finite};
use mrac_control::{AdaptationLaw, ControlLaw, ParameterEstimate, ReferenceModel};
use serde::{Deserialize, Serialize};

/// Integrator selection for the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, 4 rhs calls per step).
    #[default]
    Rk4,
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
}

/// Options for loop runs.
#[derive(Clone, Debug)]
pub struct LoopOptions {
    /// Fixed tick size (seconds)
    pub dt: Real,
    /// Total simulated time (seconds)
    pub horizon: Real,
    /// Maximum number of ticks (safety limit)
    pub max_steps: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            dt: 1e-2,
            horizon: 10.0,
            max_steps: 10_000_000,
            integrator: IntegratorType::default(),
        }
    }
}

impl LoopOptions {
    /// Validate before the run starts; a bad configuration must not tick.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SimError::InvalidArg {
                what: "dt must be positive and finite",
            });
        }
        if !(self.horizon > 0.0) || !self.horizon.is_finite() {
            return Err(SimError::InvalidArg {
                what: "horizon must be positive and finite",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        // A run that would hit the cap cannot reach its horizon; reject it
        // up front rather than returning a silently truncated record
        if self.tick_count() > self.max_steps {
            return Err(SimError::InvalidArg {
                what: "horizon/dt exceeds max_steps",
            });
        }
        Ok(())
    }

    /// Number of ticks in the run, fixed up front so float accumulation
    /// cannot add or drop a tick.
    pub fn tick_count(&self) -> usize {
        (self.horizon / self.dt).round() as usize
    }
}

/// Everything the scheduler needs besides the plant itself.
#[derive(Clone, Debug)]
pub struct LoopSetup {
    /// Desired closed-loop dynamics.
    pub reference: ReferenceModel,
    /// Feedback-linearizing law.
    pub control: ControlLaw,
    /// Gradient adaptation rule.
    pub adaptation: AdaptationLaw,
    /// Initial parameter estimates.
    pub estimate: ParameterEstimate,
    /// Initial reference-model state.
    pub yr0: Real,
}

/// Per-tick output tuple emitted to observers and accumulated in the
/// run record.
///
/// `t`, `y`, and `yr` are the tick-start values; `u` is the control
/// applied over the tick; `a_hat`/`b_hat` are the estimates after this
/// tick's adaptation update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: usize,
    pub t: Real,
    pub y: Real,
    pub yr: Real,
    pub u: Real,
    pub a_hat: Real,
    pub b_hat: Real,
    /// True when the divide guard forced `u = 0` this tick.
    pub degenerate: bool,
}

impl TickRecord {
    /// Tracking error `yr - y` at tick start.
    pub fn tracking_error(&self) -> Real {
        self.yr - self.y
    }
}

/// Observer verdict at a tick boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopFlow {
    /// Keep ticking.
    Continue,
    /// Cancel the run at this tick boundary (not an error).
    Stop,
}

/// Record of a completed (or cancelled) run.
#[derive(Clone, Debug)]
pub struct LoopRecord {
    /// One record per executed tick.
    pub ticks: Vec<TickRecord>,
    /// Number of ticks where the divide guard engaged.
    pub degenerate_ticks: usize,
    /// True when an observer cancelled the run before the horizon.
    pub stopped_early: bool,
    /// Plant output after the final integration step.
    pub final_y: Real,
    /// Reference output after the final integration step.
    pub final_yr: Real,
    /// Estimates as they stood when the run ended.
    pub final_estimate: ParameterEstimate,
}

impl LoopRecord {
    /// Tracking error `yr - y` after the final step.
    pub fn final_tracking_error(&self) -> Real {
        self.final_yr - self.final_y
    }
}

/// Plant with its control input held over one step (zero-order hold).
struct HeldInput<'a, P: Plant> {
    plant: &'a mut P,
    u: Real,
}

impl<'a, P: Plant> OdeSystem for HeldInput<'a, P> {
    type State = P::State;

    fn rhs(&mut self, t: Real, x: &Self::State) -> SimResult<Self::State> {
        self.plant.rhs(t, x, self.u)
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        self.plant.add(a, b)
    }

    fn scale(&self, a: &Self::State, k: Real) -> Self::State {
        self.plant.scale(a, k)
    }
}

/// Reference model driven by the external reference signal.
struct ReferenceDynamics<'a, R: Fn(Real) -> Real> {
    model: &'a ReferenceModel,
    signal: &'a R,
}

impl<'a, R: Fn(Real) -> Real> OdeSystem for ReferenceDynamics<'a, R> {
    type State = Real;

    fn rhs(&mut self, t: Real, yr: &Real) -> SimResult<Real> {
        Ok(self.model.rate(*yr, (self.signal)(t)))
    }

    fn add(&self, a: &Real, b: &Real) -> Real {
        a + b
    }

    fn scale(&self, a: &Real, k: Real) -> Real {
        a * k
    }
}

fn step_system<M: OdeSystem>(
    which: IntegratorType,
    system: &mut M,
    t: Real,
    x: &M::State,
    dt: Real,
    tick: usize,
) -> SimResult<M::State> {
    let stepped = match which {
        IntegratorType::Rk4 => Rk4.step(system, t, x, dt),
        IntegratorType::ForwardEuler => ForwardEuler.step(system, t, x, dt),
    };
    stepped.map_err(|e| SimError::Integrator {
        tick,
        message: e.to_string(),
    })
}

/// Run the adaptive loop to the configured horizon.
pub fn run_loop<P, R>(
    plant: &mut P,
    y0: P::State,
    setup: &LoopSetup,
    signal: &R,
    opts: &LoopOptions,
) -> SimResult<LoopRecord>
where
    P: Plant,
    R: Fn(Real) -> Real,
{
    run_loop_with_observer(plant, y0, setup, signal, opts, None)
}

/// Run the adaptive loop, emitting each tick's record to an observer.
///
/// The observer may cancel the run at any tick boundary by returning
/// [`LoopFlow::Stop`]; the tick that just completed is kept. A tick is
/// atomic with respect to observers: nothing is emitted mid-tick.
pub fn run_loop_with_observer<P, R>(
    plant: &mut P,
    y0: P::State,
    setup: &LoopSetup,
    signal: &R,
    opts: &LoopOptions,
    mut observer: Option<&mut dyn FnMut(&TickRecord) -> LoopFlow>,
) -> SimResult<LoopRecord>
where
    P: Plant,
    R: Fn(Real) -> Real,
{
    opts.validate()?;
    ensure_finite(setup.estimate.a_hat, "initial a_hat")?;
    ensure_finite(setup.estimate.b_hat, "initial b_hat")?;
    ensure_finite(setup.yr0, "initial yr0")?;
    if !plant.state_finite(&y0) {
        return Err(SimError::InvalidArg {
            what: "initial plant state must be finite",
        });
    }

    let n_ticks = opts.tick_count();
    let mut x = y0;
    let mut yr = setup.yr0;
    let mut est = setup.estimate;
    let mut ticks = Vec::with_capacity(n_ticks);
    let mut degenerate_ticks = 0usize;
    let mut stopped_early = false;

    tracing::debug!(dt = opts.dt, horizon = opts.horizon, n_ticks, "starting adaptive loop");

    for tick in 0..n_ticks {
        // Clock recomputed from the tick index, not accumulated
        let t = tick as Real * opts.dt;
        let y = plant.output(&x);
        let yr_now = yr;
        let e = yr_now - y;
        let basis = plant.basis(y);
        let r = signal(t);

        // (1) control from the estimate as it stood at tick start
        let decision = setup.control.control(basis, &est, r);
        if !decision.u.is_finite() {
            return Err(SimError::Diverged {
                tick,
                what: "control input",
                value: decision.u,
            });
        }
        if decision.degenerate {
            if degenerate_ticks == 0 {
                tracing::warn!(
                    tick,
                    b_hat = est.b_hat,
                    "input-gain estimate inside guard band; holding u = 0"
                );
            }
            degenerate_ticks += 1;
        }

        // (2) adaptation with the same u and the tick-start error
        setup.adaptation.update(&mut est, e, basis, decision.u, opts.dt);
        if !est.a_hat.is_finite() {
            return Err(SimError::Diverged {
                tick,
                what: "estimate a_hat",
                value: est.a_hat,
            });
        }
        if !est.b_hat.is_finite() {
            return Err(SimError::Diverged {
                tick,
                what: "estimate b_hat",
                value: est.b_hat,
            });
        }

        // (3) plant step under zero-order hold
        let mut held = HeldInput {
            plant: &mut *plant,
            u: decision.u,
        };
        x = step_system(opts.integrator, &mut held, t, &x, opts.dt, tick)?;
        if !plant.state_finite(&x) {
            return Err(SimError::Diverged {
                tick,
                what: "plant state",
                value: plant.output(&x),
            });
        }

        // (4) reference step through the same integrator abstraction
        let mut reference = ReferenceDynamics {
            model: &setup.reference,
            signal,
        };
        yr = step_system(opts.integrator, &mut reference, t, &yr, opts.dt, tick)?;
        if !yr.is_finite() {
            return Err(SimError::Diverged {
                tick,
                what: "reference state",
                value: yr,
            });
        }

        let record = TickRecord {
            tick,
            t,
            y,
            yr: yr_now,
            u: decision.u,
            a_hat: est.a_hat,
            b_hat: est.b_hat,
            degenerate: decision.degenerate,
        };
        ticks.push(record);

        // (5) cancellation is only honored at tick boundaries
        if let Some(obs) = observer.as_mut() {
            if obs(&record) == LoopFlow::Stop {
                stopped_early = true;
                break;
            }
        }
    }

    let final_y = plant.output(&x);
    tracing::debug!(
        ticks = ticks.len(),
        degenerate_ticks,
        final_error = yr - final_y,
        "adaptive loop finished"
    );

    Ok(LoopRecord {
        ticks,
        degenerate_ticks,
        stopped_early,
        final_y,
        final_yr: yr,
        final_estimate: est,
    })
}
