//! Adaptive-loop simulation framework.
//!
//! Provides:
//! - `Plant` trait for the opaque system under control
//! - Fixed-step integrators (RK4, forward Euler) behind a method-agnostic
//!   single-step contract
//! - The adaptive loop scheduler: one control-adapt-integrate cycle per
//!   tick, with per-tick record emission and divergence detection
//! - Scenario configuration for the cubic benchmark plant

pub mod error;
pub mod integrator;
pub mod plant;
pub mod scenario;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, OdeSystem, Rk4};
pub use plant::{CubicPlant, Plant};
pub use scenario::ScenarioConfig;
pub use sim::{
    IntegratorType, LoopFlow, LoopOptions, LoopRecord, LoopSetup, TickRecord, run_loop,
    run_loop_with_observer,
};
