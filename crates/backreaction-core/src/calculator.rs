// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Adaptive Coefficient Calculator
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────
//! Facade that turns a [`StateSnapshot`] into a bounded, smoothed
//! backreaction coefficient plus [`Diagnostics`].
//!
//! Pipeline per call:
//!   1. Cache lookup on the quantized state (hit → stored result).
//!   2. Bypass when dynamic calculation is disabled (→ baseline).
//!   3. baseline × each enabled factor.
//!   4. Safety clamp.
//!   5. Adaptive smoothing against the last accepted value, re-clamped.
//!   6. Metrics, history, diagnostics, cache store.
//!
//! Not thread-safe: `compute` takes `&mut self` and the result depends on
//! call order. Share one instance through [`crate::SharedCalculator`] or
//! give each caller its own.

use std::time::Instant;

use backreaction_types::{
    BackreactionConfig, BackreactionResult, Diagnostics, PerformanceSummary, StateSnapshot,
};

use crate::cache::{CacheKey, ResultCache};
use crate::factors;
use crate::metrics::Metrics;
use crate::safety::apply_safety_constraints;
use crate::smoother::AdaptiveSmoother;

/// Multi-factor, cached, safety-clamped, smoothed coefficient calculator.
#[derive(Debug)]
pub struct BackreactionCalculator {
    config: BackreactionConfig,
    cache: ResultCache,
    smoother: AdaptiveSmoother,
    metrics: Metrics,
}

impl BackreactionCalculator {
    /// Build a calculator after validating `config`.
    pub fn new(config: BackreactionConfig) -> BackreactionResult<Self> {
        config.validate()?;
        let cache_size = if config.enable_caching {
            config.cache_size
        } else {
            0
        };
        Ok(Self {
            cache: ResultCache::new(cache_size),
            smoother: AdaptiveSmoother::from_config(&config),
            metrics: Metrics::default(),
            config,
        })
    }

    /// Compute the coefficient for `state`.
    ///
    /// Never fails. With dynamic calculation enabled the value lies in
    /// `[min_beta, max_beta]`; disabled, it is exactly `baseline_beta`.
    pub fn compute(&mut self, state: &StateSnapshot) -> (f64, Diagnostics) {
        let start = Instant::now();
        let baseline = self.config.baseline_beta;

        let key = self
            .config
            .enable_caching
            .then(|| CacheKey::quantize(state, self.config.cache_tolerance));

        if let Some(entry) = key.as_ref().and_then(|k| self.cache.get(k)) {
            let value = entry.value;
            let mut diagnostics = entry.diagnostics.clone();
            diagnostics.cache_hit = true;
            self.metrics.record_hit();
            return (value, diagnostics);
        }

        if !self.config.enable_dynamic_calculation {
            self.metrics.record_bypass();
            return (baseline, Diagnostics::baseline_only(baseline));
        }

        let components = factors::enabled_contributions(state, &self.config);
        let unconstrained = components
            .iter()
            .fold(baseline, |value, &(_, factor)| value * factor);

        let (clamped, mut constraint_applied) =
            apply_safety_constraints(unconstrained, state, &self.config);

        // The last accepted value may have been bounded by different caps,
        // so the blend is bounded again against the current state.
        let smoothed = self.smoother.smooth(clamped);
        let (value, reclamped) = apply_safety_constraints(smoothed, state, &self.config);
        constraint_applied |= reclamped;

        let elapsed = start.elapsed();
        self.metrics.record_computation(value, elapsed);
        self.smoother.accept(value);

        let diagnostics = Diagnostics {
            components,
            baseline_beta: baseline,
            final_beta: value,
            enhancement_ratio: value / baseline,
            safety_constraint_applied: constraint_applied,
            cache_hit: false,
            dynamic_calculation: true,
            computation_time_ms: elapsed.as_secs_f64() * 1000.0,
        };

        if let Some(key) = key {
            self.cache.insert(key, value, diagnostics.clone());
        }

        (value, diagnostics)
    }

    /// Read-only snapshot of the aggregated counters.
    pub fn performance_summary(&self) -> PerformanceSummary {
        self.metrics.summary(self.cache.len(), self.smoother.len())
    }

    /// Clear counters, history and cache.
    pub fn reset(&mut self) {
        self.metrics.reset();
        self.smoother.clear();
        self.cache.clear();
        log::info!("Backreaction calculator reset");
    }

    /// Read-only access to config.
    pub fn config(&self) -> &BackreactionConfig {
        &self.config
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn history_len(&self) -> usize {
        self.smoother.len()
    }
}

/// Calculator with every correction enabled.
pub fn create_enhanced_calculator(
    baseline_beta: f64,
    secondary_scale: f64,
    max_velocity_fraction: f64,
) -> BackreactionResult<BackreactionCalculator> {
    BackreactionCalculator::new(BackreactionConfig::enhanced(
        baseline_beta,
        secondary_scale,
        max_velocity_fraction,
    ))
}
