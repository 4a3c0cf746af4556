// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — State Snapshot
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Input dimensions for one evaluation of the calculator.
///
/// Construction never fails: out-of-range values (negative field
/// strength, velocity above the configured limit) are accepted here and
/// bounded by the factor functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Field strength, expected >= 0.
    pub field_strength: f64,
    /// Signed velocity (m/s).
    pub velocity: f64,
    /// Signed curvature; only the magnitude matters.
    pub curvature: f64,
    /// Secondary decay parameter μ, expected in [0, ~1].
    pub mu: f64,
    /// Caller's logical time (s). Informational only.
    pub timestamp: f64,
    /// Caller's step size (s). Informational only.
    pub dt: f64,
}

impl StateSnapshot {
    pub fn new(field_strength: f64, velocity: f64, curvature: f64, mu: f64) -> Self {
        Self {
            field_strength,
            velocity,
            curvature,
            mu,
            timestamp: 0.0,
            dt: 0.0,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// The four dimensions that determine the result, in factor order.
    pub fn dimensions(&self) -> [f64; 4] {
        [self.field_strength, self.velocity, self.curvature, self.mu]
    }

    /// Signed velocity as a fraction of `reference_speed`, clamped to
    /// `±max_fraction`. NaN velocity maps to 0.
    pub fn velocity_fraction(&self, reference_speed: f64, max_fraction: f64) -> f64 {
        let frac = self.velocity / reference_speed;
        if frac.is_nan() {
            return 0.0;
        }
        frac.clamp(-max_fraction, max_fraction)
    }
}
