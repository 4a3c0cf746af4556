// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Diagnostics and Performance Types
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_finite: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_finite: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// The four correction factors, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Field,
    Velocity,
    Curvature,
    Secondary,
}

impl FactorKind {
    pub const ALL: [FactorKind; 4] = [
        FactorKind::Field,
        FactorKind::Velocity,
        FactorKind::Curvature,
        FactorKind::Secondary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FactorKind::Field => "field",
            FactorKind::Velocity => "velocity",
            FactorKind::Curvature => "curvature",
            FactorKind::Secondary => "secondary",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Structured explanation returned alongside every computed coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Contribution of each enabled factor, in evaluation order.
    pub components: Vec<(FactorKind, f64)>,
    pub baseline_beta: f64,
    pub final_beta: f64,
    /// `final_beta / baseline_beta`.
    pub enhancement_ratio: f64,
    /// True when the safety clamp changed the unconstrained value.
    pub safety_constraint_applied: bool,
    pub cache_hit: bool,
    /// False when the calculator is configured to return the baseline.
    pub dynamic_calculation: bool,
    pub computation_time_ms: f64,
}

impl Diagnostics {
    /// Diagnostics for the bypass path: baseline in, baseline out.
    pub fn baseline_only(baseline_beta: f64) -> Self {
        Self {
            components: Vec::new(),
            baseline_beta,
            final_beta: baseline_beta,
            enhancement_ratio: 1.0,
            safety_constraint_applied: false,
            cache_hit: false,
            dynamic_calculation: false,
            computation_time_ms: 0.0,
        }
    }

    /// Contribution recorded for `kind`, if that factor was enabled.
    pub fn component(&self, kind: FactorKind) -> Option<f64> {
        self.components
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, v)| v)
    }

    /// Product of all recorded contributions.
    pub fn combined_factor(&self) -> f64 {
        self.components.iter().map(|&(_, v)| v).product()
    }
}

/// Read-only snapshot of the calculator's aggregated counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// All `compute` calls, cache hits included.
    pub total_calls: u64,
    pub cache_hits: u64,
    /// Calls that ran the full factor pipeline.
    pub computed_calls: u64,
    pub cache_hit_rate: f64,
    pub total_compute_time_ms: f64,
    /// Average latency over computed calls.
    pub avg_compute_time_ms: f64,
    /// `+inf` until the first computed value.
    pub min_beta_seen: f64,
    /// `-inf` until the first computed value.
    pub max_beta_seen: f64,
    pub cache_size: usize,
    pub history_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_finite(f64::NAN, 0.5, 5.0), 0.5);
    }

    #[test]
    fn test_clamp_pos_inf() {
        assert_eq!(clamp_finite(f64::INFINITY, 0.5, 5.0), 5.0);
    }

    #[test]
    fn test_clamp_neg_inf() {
        assert_eq!(clamp_finite(f64::NEG_INFINITY, 0.5, 5.0), 0.5);
    }

    #[test]
    fn test_clamp_normal() {
        assert_eq!(clamp_finite(1.75, 0.5, 5.0), 1.75);
    }

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(clamp_finite(7.0, 0.5, 5.0), 5.0);
        assert_eq!(clamp_finite(0.1, 0.5, 5.0), 0.5);
    }

    #[test]
    fn test_factor_kind_order_and_names() {
        let names: Vec<&str> = FactorKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["field", "velocity", "curvature", "secondary"]);
        assert_eq!(FactorKind::Curvature.to_string(), "curvature");
    }

    #[test]
    fn test_baseline_only() {
        let d = Diagnostics::baseline_only(1.9);
        assert_eq!(d.final_beta, 1.9);
        assert_eq!(d.enhancement_ratio, 1.0);
        assert!(!d.dynamic_calculation);
        assert!(d.components.is_empty());
        assert_eq!(d.combined_factor(), 1.0);
    }

    #[test]
    fn test_component_lookup() {
        let d = Diagnostics {
            components: vec![(FactorKind::Field, 1.2), (FactorKind::Curvature, 0.9)],
            ..Diagnostics::baseline_only(2.0)
        };
        assert_eq!(d.component(FactorKind::Field), Some(1.2));
        assert_eq!(d.component(FactorKind::Velocity), None);
        assert!((d.combined_factor() - 1.08).abs() < 1e-12);
    }

    #[test]
    fn test_diagnostics_json_field_names() {
        let d = Diagnostics {
            components: vec![(FactorKind::Secondary, 1.0)],
            ..Diagnostics::baseline_only(2.0)
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"secondary\""));
        assert!(json.contains("\"safety_constraint_applied\":false"));
    }
}
