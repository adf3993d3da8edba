//! Error types for control-law configuration and evaluation.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring control blocks.
///
/// All variants are detected before a run starts; the evaluation paths
/// themselves are total functions and never fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control block constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
