//! Property tests for the control and adaptation laws.

use mrac_control::{AdaptationLaw, ControlLaw, ParameterEstimate};
use proptest::prelude::*;

proptest! {
    /// Away from the guard, the emitted control exactly inverts the
    /// estimated input gain: u·b̂ + â·φ = k_r·r.
    #[test]
    fn control_cancels_estimated_nonlinearity(
        k_r in -5.0f64..5.0,
        a_hat in -5.0f64..5.0,
        b_hat in prop_oneof![0.01f64..10.0, -10.0f64..-0.01],
        basis in -8.0f64..8.0,
        r in -2.0f64..2.0,
    ) {
        let law = ControlLaw::new(k_r, 1e-6).unwrap();
        let est = ParameterEstimate::new(a_hat, b_hat);
        let d = law.control(basis, &est, r);
        prop_assert!(!d.degenerate);
        let recovered = d.u * b_hat + a_hat * basis;
        prop_assert!((recovered - k_r * r).abs() < 1e-9 * (1.0 + (k_r * r).abs()));
    }

    /// Inside the guard band the fallback is exactly zero, regardless of
    /// the other inputs.
    #[test]
    fn guard_band_always_zero(
        b_hat in -1e-7f64..1e-7,
        a_hat in -5.0f64..5.0,
        basis in -8.0f64..8.0,
        r in -2.0f64..2.0,
    ) {
        let law = ControlLaw::new(1.5, 1e-6).unwrap();
        let est = ParameterEstimate::new(a_hat, b_hat);
        let d = law.control(basis, &est, r);
        prop_assert!(d.degenerate);
        prop_assert_eq!(d.u, 0.0);
    }

    /// The gradient step moves each estimate by exactly -gamma·e·regressor·dt.
    #[test]
    fn adaptation_increment_matches_rule(
        gamma_a in 1e-3f64..1.0,
        gamma_b in 1e-3f64..1.0,
        e in -2.0f64..2.0,
        basis in -8.0f64..8.0,
        u in -10.0f64..10.0,
        dt in 1e-4f64..0.1,
    ) {
        let law = AdaptationLaw::new(gamma_a, gamma_b).unwrap();
        let mut est = ParameterEstimate::new(0.3, -0.7);
        let before = est;
        law.update(&mut est, e, basis, u, dt);
        prop_assert!((est.a_hat - before.a_hat + gamma_a * e * basis * dt).abs() < 1e-12);
        prop_assert!((est.b_hat - before.b_hat + gamma_b * e * u * dt).abs() < 1e-12);
    }
}
