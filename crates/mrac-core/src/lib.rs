//! mrac-core: stable foundation for the adaptive-control workspace.
//!
//! Contains:
//! - numeric (Real + float helpers shared by the control and sim crates)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
