// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Adaptive Smoother
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────
//! Exponential moving average over accepted coefficients.
//!
//!   alpha = 1 − exp(−time_step / time_constant)
//!   out   = alpha · value + (1 − alpha) · last_accepted
//!
//! The blend only starts once two values have been accepted, so the
//! first outputs of a fresh calculator pass through untouched.

use std::collections::VecDeque;

use backreaction_types::BackreactionConfig;

/// Bounded history of accepted values plus the blend weight.
#[derive(Debug, Clone)]
pub struct AdaptiveSmoother {
    alpha: f64,
    capacity: usize,
    history: VecDeque<f64>,
}

impl AdaptiveSmoother {
    pub fn new(alpha: f64, capacity: usize) -> Self {
        Self {
            alpha,
            capacity,
            history: VecDeque::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &BackreactionConfig) -> Self {
        Self::new(config.smoothing_alpha(), config.history_size)
    }

    /// Blend `value` with the most recent accepted value.
    ///
    /// No-op while fewer than two values have been accepted.
    pub fn smooth(&self, value: f64) -> f64 {
        if self.history.len() < 2 {
            return value;
        }
        match self.history.back() {
            Some(&last) => self.alpha * value + (1.0 - self.alpha) * last,
            None => value,
        }
    }

    /// Append an accepted value, dropping the oldest past capacity.
    pub fn accept(&mut self, value: f64) {
        self.history.push_back(value);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn last(&self) -> Option<f64> {
        self.history.back().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_with_short_history() {
        let mut s = AdaptiveSmoother::new(0.5, 10);
        assert_eq!(s.smooth(3.0), 3.0);
        s.accept(1.0);
        assert_eq!(s.smooth(3.0), 3.0);
    }

    #[test]
    fn test_blend_with_last_value() {
        let mut s = AdaptiveSmoother::new(0.25, 10);
        s.accept(1.0);
        s.accept(2.0);
        // 0.25 * 4.0 + 0.75 * 2.0 = 2.5
        assert!((s.smooth(4.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_history_bounded() {
        let mut s = AdaptiveSmoother::new(0.1, 5);
        for i in 0..20 {
            s.accept(i as f64);
        }
        assert_eq!(s.len(), 5);
        assert_eq!(s.last(), Some(19.0));
    }

    #[test]
    fn test_alpha_from_config() {
        let cfg = BackreactionConfig {
            time_constant: 1.0,
            time_step: 1.0,
            ..Default::default()
        };
        let s = AdaptiveSmoother::from_config(&cfg);
        assert!((s.alpha() - (1.0 - (-1.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_clear() {
        let mut s = AdaptiveSmoother::new(0.1, 5);
        s.accept(1.0);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.last(), None);
    }
}
