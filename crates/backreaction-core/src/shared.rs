// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Shared Calculator
// ─────────────────────────────────────────────────────────────────────
//! One calculator serialized behind a single mutex.
//!
//! The whole `compute` call is the critical section: cache, history and
//! metrics move together, and interleaved callers see outputs in the
//! order the lock was acquired.

use std::sync::Arc;

use parking_lot::Mutex;

use backreaction_types::{
    BackreactionConfig, BackreactionResult, Diagnostics, PerformanceSummary, StateSnapshot,
};

use crate::calculator::BackreactionCalculator;

/// Cloneable handle to a mutex-guarded [`BackreactionCalculator`].
#[derive(Debug, Clone)]
pub struct SharedCalculator {
    inner: Arc<Mutex<BackreactionCalculator>>,
}

impl SharedCalculator {
    pub fn new(config: BackreactionConfig) -> BackreactionResult<Self> {
        Ok(Self::from_calculator(BackreactionCalculator::new(config)?))
    }

    pub fn from_calculator(calculator: BackreactionCalculator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(calculator)),
        }
    }

    pub fn compute(&self, state: &StateSnapshot) -> (f64, Diagnostics) {
        self.inner.lock().compute(state)
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.inner.lock().performance_summary()
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn config(&self) -> BackreactionConfig {
        self.inner.lock().config().clone()
    }
}
