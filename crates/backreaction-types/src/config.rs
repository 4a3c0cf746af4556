// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Calculator Configuration
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{BackreactionError, BackreactionResult};

/// Exact backreaction coefficient used before dynamic correction existed.
pub const EXACT_BACKREACTION_BETA: f64 = 1.9443254780147017;

/// Speed of light in m/s, the default reference speed for velocity fractions.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Runtime configuration for the backreaction calculator.
///
/// Created once and read-only for the calculator's lifetime. Missing
/// fields in a JSON document fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackreactionConfig {
    /// Coefficient before any dynamic correction.
    /// Default: 1.9443254780147017 (exact backreaction value).
    pub baseline_beta: f64,

    /// Master switch. When false, `compute` returns `baseline_beta`
    /// unclamped and unsmoothed.
    /// Default: true.
    pub enable_dynamic_calculation: bool,

    /// Apply the saturating field-strength factor.
    /// Default: true.
    pub enable_field_correction: bool,
    /// Apply the γ-weighted velocity factor.
    /// Default: true.
    pub enable_velocity_correction: bool,
    /// Apply the damped logarithmic curvature factor.
    /// Default: true.
    pub enable_curvature_correction: bool,
    /// Apply the sinc-profile secondary factor on μ.
    /// Default: true.
    pub enable_secondary_correction: bool,

    /// Characteristic field strength of the tanh ramp.
    /// Default: 1.0.
    pub field_scale: f64,
    /// Field strength at which the linear saturation term bottoms out.
    /// Default: 10.0.
    pub field_saturation: f64,
    /// Upper bound of the field factor.
    /// Default: 2.0.
    pub max_field_enhancement: f64,

    /// Reference speed for velocity fractions (m/s).
    /// Default: 299 792 458 (speed of light).
    pub reference_speed: f64,
    /// Velocity fractions are clamped to ±this value.
    /// Default: 0.99.
    pub max_velocity_fraction: f64,
    /// Fraction at which the γ-weighted boost takes over.
    /// Default: 0.1.
    pub relativistic_threshold: f64,

    /// Curvature magnitude scale of the logarithmic ramp.
    /// Default: 1.0.
    pub curvature_scale: f64,
    /// Exponential cutoff scale; also drives the high-curvature cap.
    /// Default: 100.0.
    pub curvature_saturation: f64,
    /// Gain applied to the damped logarithmic ramp.
    /// Default: 0.3.
    pub curvature_gain: f64,
    /// Upper bound of the curvature factor.
    /// Default: 2.5.
    pub max_curvature_enhancement: f64,

    /// Multiplier applied to μ before the sinc profile.
    /// Default: 1.0.
    pub secondary_scale: f64,

    /// Global lower bound of the combined coefficient.
    /// Default: 0.5.
    pub min_beta: f64,
    /// Global upper bound of the combined coefficient.
    /// Default: 5.0.
    pub max_beta: f64,

    /// Smoothing time constant (s).
    /// Default: 0.1.
    pub time_constant: f64,
    /// Integration step used to derive the blend weight (s).
    /// Default: 0.01.
    pub time_step: f64,
    /// Maximum number of accepted values kept for smoothing.
    /// Default: 100.
    pub history_size: usize,

    /// Memoize results by quantized state.
    /// Default: true.
    pub enable_caching: bool,
    /// Maximum number of cached results.
    /// Default: 1000.
    pub cache_size: usize,
    /// Quantization step for cache keys.
    /// Default: 1e-6.
    pub cache_tolerance: f64,
}

impl Default for BackreactionConfig {
    fn default() -> Self {
        Self {
            baseline_beta: EXACT_BACKREACTION_BETA,
            enable_dynamic_calculation: true,
            enable_field_correction: true,
            enable_velocity_correction: true,
            enable_curvature_correction: true,
            enable_secondary_correction: true,
            field_scale: 1.0,
            field_saturation: 10.0,
            max_field_enhancement: 2.0,
            reference_speed: SPEED_OF_LIGHT,
            max_velocity_fraction: 0.99,
            relativistic_threshold: 0.1,
            curvature_scale: 1.0,
            curvature_saturation: 100.0,
            curvature_gain: 0.3,
            max_curvature_enhancement: 2.5,
            secondary_scale: 1.0,
            min_beta: 0.5,
            max_beta: 5.0,
            time_constant: 0.1,
            time_step: 0.01,
            history_size: 100,
            enable_caching: true,
            cache_size: 1000,
            cache_tolerance: 1e-6,
        }
    }
}

impl BackreactionConfig {
    /// Configuration with every correction enabled, tuned by the three
    /// parameters callers adjust most often.
    pub fn enhanced(baseline_beta: f64, secondary_scale: f64, max_velocity_fraction: f64) -> Self {
        Self {
            baseline_beta,
            secondary_scale,
            max_velocity_fraction,
            ..Self::default()
        }
    }

    /// Blend weight of the exponential moving average.
    pub fn smoothing_alpha(&self) -> f64 {
        1.0 - (-self.time_step / self.time_constant).exp()
    }

    /// Validate configuration parameters.
    ///
    /// Checks each field by type and range; physical plausibility of the
    /// constants is the caller's business.
    pub fn validate(&self) -> BackreactionResult<()> {
        let finite = [
            ("baseline_beta", self.baseline_beta),
            ("secondary_scale", self.secondary_scale),
            ("curvature_gain", self.curvature_gain),
            ("min_beta", self.min_beta),
            ("max_beta", self.max_beta),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(BackreactionError::Numerical(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        let positive = [
            ("field_scale", self.field_scale),
            ("field_saturation", self.field_saturation),
            ("max_field_enhancement", self.max_field_enhancement),
            ("reference_speed", self.reference_speed),
            ("curvature_scale", self.curvature_scale),
            ("curvature_saturation", self.curvature_saturation),
            ("max_curvature_enhancement", self.max_curvature_enhancement),
            ("time_constant", self.time_constant),
            ("time_step", self.time_step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(BackreactionError::Config(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        if !(self.max_velocity_fraction > 0.0 && self.max_velocity_fraction < 1.0) {
            return Err(BackreactionError::Config(format!(
                "max_velocity_fraction must be in (0, 1), got {}",
                self.max_velocity_fraction
            )));
        }
        if !(0.0..1.0).contains(&self.relativistic_threshold) {
            return Err(BackreactionError::Config(format!(
                "relativistic_threshold must be in [0, 1), got {}",
                self.relativistic_threshold
            )));
        }
        if self.min_beta > self.max_beta {
            return Err(BackreactionError::Config(format!(
                "min_beta must be <= max_beta, got {} > {}",
                self.min_beta, self.max_beta
            )));
        }
        if self.history_size < 1 {
            return Err(BackreactionError::Config(format!(
                "history_size must be >= 1, got {}",
                self.history_size
            )));
        }
        if self.enable_caching {
            if self.cache_size < 1 {
                return Err(BackreactionError::Config(format!(
                    "cache_size must be >= 1 when caching is enabled, got {}",
                    self.cache_size
                )));
            }
            if !(self.cache_tolerance.is_finite() && self.cache_tolerance > 0.0) {
                return Err(BackreactionError::Config(format!(
                    "cache_tolerance must be finite and > 0, got {}",
                    self.cache_tolerance
                )));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> BackreactionResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| BackreactionError::Config(format!("JSON parse error: {e}")))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> BackreactionResult<String> {
        serde_json::to_string(self)
            .map_err(|e| BackreactionError::Config(format!("JSON encode error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BackreactionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_baseline_is_exact_value() {
        let cfg = BackreactionConfig::default();
        assert_eq!(cfg.baseline_beta, EXACT_BACKREACTION_BETA);
    }

    #[test]
    fn test_enhanced_enables_everything() {
        let cfg = BackreactionConfig::enhanced(2.0, 0.5, 0.8);
        assert_eq!(cfg.baseline_beta, 2.0);
        assert_eq!(cfg.secondary_scale, 0.5);
        assert_eq!(cfg.max_velocity_fraction, 0.8);
        assert!(cfg.enable_dynamic_calculation);
        assert!(cfg.enable_field_correction);
        assert!(cfg.enable_velocity_correction);
        assert!(cfg.enable_curvature_correction);
        assert!(cfg.enable_secondary_correction);
        assert!(cfg.enable_caching);
    }

    #[test]
    fn test_smoothing_alpha() {
        let cfg = BackreactionConfig::default();
        let expected = 1.0 - (-0.1f64).exp();
        assert!((cfg.smoothing_alpha() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let cfg = BackreactionConfig {
            min_beta: 3.0,
            max_beta: 2.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("min_beta"));
    }

    #[test]
    fn test_rejects_zero_cache_when_enabled() {
        let cfg = BackreactionConfig {
            cache_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_cache_allowed_when_disabled() {
        let cfg = BackreactionConfig {
            enable_caching: false,
            cache_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_accepts_zero_lower_bound() {
        let cfg = BackreactionConfig {
            min_beta: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_accepts_zero_baseline() {
        let cfg = BackreactionConfig {
            baseline_beta: 0.0,
            enable_dynamic_calculation: false,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_nan_baseline() {
        let cfg = BackreactionConfig {
            baseline_beta: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(BackreactionError::Numerical(_))
        ));
    }

    #[test]
    fn test_rejects_infinite_upper_bound() {
        let cfg = BackreactionConfig {
            max_beta: f64::INFINITY,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_history() {
        let cfg = BackreactionConfig {
            history_size: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_velocity_fraction_at_light_speed() {
        let cfg = BackreactionConfig {
            max_velocity_fraction: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_time_constant() {
        let cfg = BackreactionConfig {
            time_constant: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_infinite_secondary_scale() {
        let cfg = BackreactionConfig {
            secondary_scale: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(BackreactionError::Numerical(_))
        ));
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let cfg = BackreactionConfig::from_json(r#"{"baseline_beta": 2.5, "cache_size": 8}"#)
            .unwrap();
        assert_eq!(cfg.baseline_beta, 2.5);
        assert_eq!(cfg.cache_size, 8);
        assert_eq!(cfg.max_beta, 5.0);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = BackreactionConfig::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("JSON parse error"));
    }
}
