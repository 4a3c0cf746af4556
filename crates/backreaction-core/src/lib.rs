// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Core Calculator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Adaptive backreaction coefficient calculator.
//!
//! Replaces the hardcoded exact backreaction value with a multi-factor,
//! cached, safety-clamped, temporally-smoothed computation, evaluated
//! once per control cycle by the caller.
//!
//! # Invariants
//!
//! 1. **Bounded output**: with dynamic calculation enabled every returned
//!    value lies in `[min_beta, max_beta]`, and inside the curvature and
//!    relativistic caps whenever the current state triggers them.
//!
//! 2. **Exact bypass**: with dynamic calculation disabled the result is
//!    `baseline_beta` bit-for-bit, never clamped or smoothed.
//!
//! 3. **Infallible hot path**: `compute` never panics or returns an
//!    error. Zero, negative, NaN and Inf inputs are absorbed by the
//!    factor functions and the clamp.
//!
//! 4. **Bounded memory**: the cache holds at most `cache_size` entries
//!    (FIFO eviction) and the history at most `history_size` values.

pub mod cache;
pub mod calculator;
pub mod factors;
pub mod metrics;
pub mod safety;
pub mod shared;
pub mod smoother;

pub use cache::{CacheKey, ResultCache};
pub use calculator::{create_enhanced_calculator, BackreactionCalculator};
pub use metrics::Metrics;
pub use safety::apply_safety_constraints;
pub use shared::SharedCalculator;
pub use smoother::AdaptiveSmoother;
