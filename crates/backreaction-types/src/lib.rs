// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Backreaction Kernel — the adaptive enhancement-coefficient calculator
//! that replaces the hardcoded exact backreaction value.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod state;

pub use config::{BackreactionConfig, EXACT_BACKREACTION_BETA, SPEED_OF_LIGHT};
pub use diagnostics::{clamp_finite, Diagnostics, FactorKind, PerformanceSummary};
pub use error::{BackreactionError, BackreactionResult};
pub use state::StateSnapshot;
