//! Error types for the adaptive loop.

use thiserror::Error;

/// Errors encountered while configuring or running the adaptive loop.
///
/// Divergence and integrator failures are terminal for a run: a control
/// loop cannot retry a physical tick, so no retry path exists anywhere.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A state, estimate, or control quantity became non-finite.
    #[error("Numeric divergence at tick {tick}: {what} = {value}")]
    Diverged {
        tick: usize,
        what: &'static str,
        value: f64,
    },

    /// The step integrator (or the plant collaborator inside it) failed.
    #[error("Integrator failed at tick {tick}: {message}")]
    Integrator { tick: usize, message: String },

    /// Failure reported by an external collaborator.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<mrac_control::ControlError> for SimError {
    fn from(e: mrac_control::ControlError) -> Self {
        match e {
            mrac_control::ControlError::InvalidArg { what } => SimError::InvalidArg { what },
        }
    }
}

impl From<mrac_core::CoreError> for SimError {
    fn from(e: mrac_core::CoreError) -> Self {
        match e {
            // Non-finite values only surface here during pre-run
            // validation; mid-run they are reported as Diverged with a
            // tick index instead.
            mrac_core::CoreError::NonFinite { what, .. } => SimError::InvalidArg { what },
        }
    }
}
