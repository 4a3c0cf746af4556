// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Safety Clamp
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────
//! Post-hoc bounding of the combined coefficient.
//!
//! Order of operations:
//!   1. Two-sided clamp to `[min_beta, max_beta]` (NaN → `min_beta`).
//!   2. High-curvature cap: `|R| > 0.5 · curvature_saturation` → `≤ 2.0`.
//!   3. Relativistic cap: `|β| > 0.5` → `≤ 1 + 2·(1 − |β|)`.
//!
//! Caps read the raw state, not the factor-multiplied value. A cap never
//! pushes the result below `min_beta`.

use backreaction_types::{clamp_finite, BackreactionConfig, StateSnapshot};

/// Ceiling applied when curvature exceeds half its saturation limit.
pub const HIGH_CURVATURE_CAP: f64 = 2.0;

/// Fraction of the saturation limit that triggers the curvature cap.
pub const CURVATURE_CAP_TRIGGER: f64 = 0.5;

/// Velocity fraction above which the relativistic cap applies.
pub const VELOCITY_CAP_TRIGGER: f64 = 0.5;

/// Upper bound imposed by the current state, if any cap is triggered.
pub fn context_cap(state: &StateSnapshot, config: &BackreactionConfig) -> Option<f64> {
    let mut cap: Option<f64> = None;

    if state.curvature.abs() > CURVATURE_CAP_TRIGGER * config.curvature_saturation {
        cap = Some(HIGH_CURVATURE_CAP);
    }

    let frac = state
        .velocity_fraction(config.reference_speed, config.max_velocity_fraction)
        .abs();
    if frac > VELOCITY_CAP_TRIGGER {
        let velocity_cap = 1.0 + 2.0 * (1.0 - frac);
        cap = Some(cap.map_or(velocity_cap, |c| c.min(velocity_cap)));
    }

    cap
}

/// Enforce global and context-dependent bounds.
///
/// Returns `(bounded, applied)` where `applied` is true when the result
/// differs from the input.
pub fn apply_safety_constraints(
    value: f64,
    state: &StateSnapshot,
    config: &BackreactionConfig,
) -> (f64, bool) {
    let mut bounded = clamp_finite(value, config.min_beta, config.max_beta);
    if let Some(cap) = context_cap(state, config) {
        bounded = bounded.min(cap).max(config.min_beta);
    }

    let applied = bounded != value;
    if applied {
        log::debug!("safety constraint applied: {value:.6} -> {bounded:.6}");
    }
    (bounded, applied)
}
