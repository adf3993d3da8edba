//! Control-side building blocks for the model-reference adaptive loop.
//!
//! Provides:
//! - **ReferenceModel**: first-order stable dynamic defining the desired trajectory
//! - **ControlLaw**: feedback-linearizing law with a divide-guard degeneracy
//! - **AdaptationLaw**: gradient (MIT-rule) parameter update
//! - **ParameterEstimate**: the online estimates threaded through each tick
//! - **ReferenceSignal**: configurable `r(t)` sources
//!
//! All blocks are pure or locally-mutating; the loop scheduler in `mrac-sim`
//! owns the per-tick ordering.

pub mod adaptation;
pub mod control;
pub mod error;
pub mod estimate;
pub mod reference;
pub mod signal;

pub use adaptation::AdaptationLaw;
pub use control::{ControlDecision, ControlLaw, DEFAULT_EPSILON};
pub use error::{ControlError, ControlResult};
pub use estimate::ParameterEstimate;
pub use reference::ReferenceModel;
pub use signal::ReferenceSignal;
