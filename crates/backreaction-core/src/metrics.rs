// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Metrics Aggregator
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────

use std::time::Duration;

use backreaction_types::PerformanceSummary;

/// Running counters over the calculator's lifetime.
///
/// Only computed calls contribute latency and min/max; cache hits bump
/// the hit counter and nothing else.
#[derive(Debug, Clone)]
pub struct Metrics {
    total_calls: u64,
    cache_hits: u64,
    computed_calls: u64,
    total_compute_time: Duration,
    min_beta: f64,
    max_beta: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            total_calls: 0,
            cache_hits: 0,
            computed_calls: 0,
            total_compute_time: Duration::ZERO,
            min_beta: f64::INFINITY,
            max_beta: f64::NEG_INFINITY,
        }
    }
}

impl Metrics {
    pub fn record_hit(&mut self) {
        self.total_calls += 1;
        self.cache_hits += 1;
    }

    /// A call answered with the baseline because dynamic calculation is off.
    pub fn record_bypass(&mut self) {
        self.total_calls += 1;
    }

    pub fn record_computation(&mut self, value: f64, elapsed: Duration) {
        self.total_calls += 1;
        self.computed_calls += 1;
        self.total_compute_time += elapsed;
        self.min_beta = self.min_beta.min(value);
        self.max_beta = self.max_beta.max(value);
    }

    pub fn total_calls(&self) -> u64 {
        self.total_calls
    }

    pub fn cache_hit_rate(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.total_calls as f64
    }

    pub fn avg_compute_time_ms(&self) -> f64 {
        if self.computed_calls == 0 {
            return 0.0;
        }
        self.total_compute_time.as_secs_f64() * 1000.0 / self.computed_calls as f64
    }

    pub fn summary(&self, cache_size: usize, history_len: usize) -> PerformanceSummary {
        PerformanceSummary {
            total_calls: self.total_calls,
            cache_hits: self.cache_hits,
            computed_calls: self.computed_calls,
            cache_hit_rate: self.cache_hit_rate(),
            total_compute_time_ms: self.total_compute_time.as_secs_f64() * 1000.0,
            avg_compute_time_ms: self.avg_compute_time_ms(),
            min_beta_seen: self.min_beta,
            max_beta_seen: self.max_beta,
            cache_size,
            history_len,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_sentinels() {
        let s = Metrics::default().summary(0, 0);
        assert_eq!(s.total_calls, 0);
        assert_eq!(s.min_beta_seen, f64::INFINITY);
        assert_eq!(s.max_beta_seen, f64::NEG_INFINITY);
        assert_eq!(s.cache_hit_rate, 0.0);
        assert_eq!(s.avg_compute_time_ms, 0.0);
    }

    #[test]
    fn test_hit_rate() {
        let mut m = Metrics::default();
        m.record_computation(2.0, Duration::from_micros(10));
        m.record_hit();
        m.record_hit();
        m.record_computation(1.0, Duration::from_micros(10));
        assert_eq!(m.total_calls(), 4);
        assert!((m.cache_hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_and_latency() {
        let mut m = Metrics::default();
        m.record_computation(2.0, Duration::from_millis(2));
        m.record_computation(1.5, Duration::from_millis(4));
        m.record_hit();
        let s = m.summary(2, 2);
        assert_eq!(s.min_beta_seen, 1.5);
        assert_eq!(s.max_beta_seen, 2.0);
        assert_eq!(s.computed_calls, 2);
        assert!((s.avg_compute_time_ms - 3.0).abs() < 1e-9);
        assert!((s.total_compute_time_ms - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_bypass_counts_call_only() {
        let mut m = Metrics::default();
        m.record_bypass();
        let s = m.summary(0, 0);
        assert_eq!(s.total_calls, 1);
        assert_eq!(s.computed_calls, 0);
        assert_eq!(s.min_beta_seen, f64::INFINITY);
    }

    #[test]
    fn test_reset() {
        let mut m = Metrics::default();
        m.record_computation(2.0, Duration::from_millis(1));
        m.record_hit();
        m.reset();
        let s = m.summary(0, 0);
        assert_eq!(s.total_calls, 0);
        assert_eq!(s.cache_hits, 0);
        assert_eq!(s.max_beta_seen, f64::NEG_INFINITY);
    }
}
