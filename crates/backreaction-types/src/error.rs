// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Error Hierarchy
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Backreaction Kernel failures.
///
/// The calculator itself never fails once constructed; errors only
/// surface while building or loading a configuration.
#[derive(Error, Debug)]
pub enum BackreactionError {
    /// Configuration error (out-of-range field, bad JSON).
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf where a finite constant is required).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type BackreactionResult<T> = Result<T, BackreactionError>;
