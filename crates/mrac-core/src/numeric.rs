use crate::CoreError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparison.
///
/// The absolute tolerance governs comparisons near zero, the relative one
/// takes over at magnitude; the defaults suit the per-tick quantities this
/// workspace compares (errors, estimates, control inputs).
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Reject NaN and infinities before they enter a run.
///
/// The loop scheduler calls this on every configured initial condition;
/// mid-run non-finiteness is reported with a tick index instead.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Mean of the absolute values over a slice window. Empty windows yield 0.
pub fn mean_abs(values: &[Real]) -> Real {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<Real>() / values.len() as Real
}
