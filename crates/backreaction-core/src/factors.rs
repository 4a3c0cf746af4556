// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Correction Factors
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────
//! Four independent multiplicative corrections to the baseline
//! coefficient, one per state dimension.
//!
//! | Factor    | Profile                                   | Range                          |
//! |-----------|-------------------------------------------|--------------------------------|
//! | field     | tanh ramp × linear saturation             | [0.1, max_field_enhancement]   |
//! | velocity  | linear below threshold, γ-weighted above  | [0.5, 3.0]                     |
//! | curvature | log ramp × exponential cutoff             | [0.5, max_curvature_enhancement] |
//! | secondary | sinc(πμ) × (1 + 0.1μ²)                    | [0.1, 2.0]                     |
//!
//! Every function is pure and total: degenerate inputs (zero, negative,
//! NaN, Inf) are absorbed by branching and never produce NaN.

use std::f64::consts::PI;

use backreaction_types::{clamp_finite, BackreactionConfig, FactorKind, StateSnapshot};

/// Inputs with magnitude below this are treated as exactly zero.
pub const NEUTRAL_EPSILON: f64 = 1e-12;

/// Floor of the field saturation term.
const FIELD_SATURATION_FLOOR: f64 = 0.1;

const VELOCITY_FACTOR_MIN: f64 = 0.5;
const VELOCITY_FACTOR_MAX: f64 = 3.0;
const VELOCITY_LINEAR_SLOPE: f64 = 0.1;
const VELOCITY_GAMMA_WEIGHT: f64 = 0.5;

const CURVATURE_FACTOR_MIN: f64 = 0.5;

const SECONDARY_FACTOR_MIN: f64 = 0.1;
const SECONDARY_FACTOR_MAX: f64 = 2.0;
const SECONDARY_QUADRATIC: f64 = 0.1;

/// Field-strength correction.
///
/// `1 + (max − 1) · tanh(f / scale) · max(1 − f / saturation, 0.1)`.
/// Exactly 1.0 for `f <= 0`.
pub fn field_factor(field_strength: f64, config: &BackreactionConfig) -> f64 {
    if field_strength.is_nan() || field_strength <= 0.0 {
        return 1.0;
    }
    let ramp = (field_strength / config.field_scale).tanh();
    let saturation =
        (1.0 - field_strength / config.field_saturation).max(FIELD_SATURATION_FLOOR);
    let factor = 1.0 + (config.max_field_enhancement - 1.0) * ramp * saturation;
    clamp_finite(factor, 0.1, config.max_field_enhancement.max(0.1))
}

/// Velocity correction.
///
/// The fraction of `reference_speed` is clamped to
/// `±max_velocity_fraction`. Below `relativistic_threshold` the
/// correction is `1 + 0.1·|β|`; at or above it a Lorentz-weighted term
/// `0.5·(γ − 1)·|β|` is added.
pub fn velocity_factor(velocity: f64, config: &BackreactionConfig) -> f64 {
    let frac = velocity / config.reference_speed;
    if frac.is_nan() {
        return 1.0;
    }
    let frac = frac.abs().min(config.max_velocity_fraction);
    if frac < NEUTRAL_EPSILON {
        return 1.0;
    }

    let linear = 1.0 + VELOCITY_LINEAR_SLOPE * frac;
    let factor = if frac < config.relativistic_threshold {
        linear
    } else {
        let gamma = 1.0 / (1.0 - frac * frac).sqrt();
        linear + VELOCITY_GAMMA_WEIGHT * (gamma - 1.0) * frac
    };
    clamp_finite(factor, VELOCITY_FACTOR_MIN, VELOCITY_FACTOR_MAX)
}

/// Curvature correction.
///
/// `1 + gain · ln(1 + |R|/scale) · exp(−|R|/saturation)`. The exponential
/// cutoff rolls extreme magnitudes back toward 1.
pub fn curvature_factor(curvature: f64, config: &BackreactionConfig) -> f64 {
    let magnitude = curvature.abs();
    if magnitude.is_nan() || magnitude < NEUTRAL_EPSILON || magnitude.is_infinite() {
        return 1.0;
    }
    let ramp = (1.0 + magnitude / config.curvature_scale).ln();
    let cutoff = (-magnitude / config.curvature_saturation).exp();
    let factor = 1.0 + config.curvature_gain * ramp * cutoff;
    clamp_finite(
        factor,
        CURVATURE_FACTOR_MIN,
        config.max_curvature_enhancement.max(CURVATURE_FACTOR_MIN),
    )
}

/// Normalized sinc, `sin(πx)/(πx)`, equal to 1 at the origin.
pub fn sinc(x: f64) -> f64 {
    if x.abs() < NEUTRAL_EPSILON {
        return 1.0;
    }
    let px = PI * x;
    px.sin() / px
}

/// Secondary-parameter correction.
///
/// `sinc(μ') · (1 + 0.1·μ'²)` with `μ' = secondary_scale · μ`.
pub fn secondary_factor(mu: f64, config: &BackreactionConfig) -> f64 {
    let mu_eff = config.secondary_scale * mu;
    if !mu_eff.is_finite() {
        return 1.0;
    }
    let factor = sinc(mu_eff) * (1.0 + SECONDARY_QUADRATIC * mu_eff * mu_eff);
    clamp_finite(factor, SECONDARY_FACTOR_MIN, SECONDARY_FACTOR_MAX)
}

/// Whether `kind` is switched on in `config`.
pub fn is_enabled(kind: FactorKind, config: &BackreactionConfig) -> bool {
    match kind {
        FactorKind::Field => config.enable_field_correction,
        FactorKind::Velocity => config.enable_velocity_correction,
        FactorKind::Curvature => config.enable_curvature_correction,
        FactorKind::Secondary => config.enable_secondary_correction,
    }
}

/// Evaluate one factor against the dimension it reads from `state`.
pub fn evaluate(kind: FactorKind, state: &StateSnapshot, config: &BackreactionConfig) -> f64 {
    match kind {
        FactorKind::Field => field_factor(state.field_strength, config),
        FactorKind::Velocity => velocity_factor(state.velocity, config),
        FactorKind::Curvature => curvature_factor(state.curvature, config),
        FactorKind::Secondary => secondary_factor(state.mu, config),
    }
}

/// Contributions of every enabled factor, in evaluation order.
pub fn enabled_contributions(
    state: &StateSnapshot,
    config: &BackreactionConfig,
) -> Vec<(FactorKind, f64)> {
    FactorKind::ALL
        .iter()
        .copied()
        .filter(|&kind| is_enabled(kind, config))
        .map(|kind| (kind, evaluate(kind, state, config)))
        .collect()
}
