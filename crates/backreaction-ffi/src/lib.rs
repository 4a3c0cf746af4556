// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Rust backreaction calculator.
//!
//! Exposes `RustBackreactionCalculator`, `BackreactionConfig`,
//! `StateSnapshot` and `Diagnostics` to the Python control loops that
//! evaluate the coefficient once per simulation step.
//!
//! # FFI Safety
//!
//! - Config validated before storage (`BackreactionConfig::validate()`);
//!   failures raise `ValueError`.
//! - `compute` never raises: degenerate inputs are absorbed on the Rust side.
//! - Each Python object owns its calculator; PyO3's borrow checking
//!   serializes `compute` calls on the same instance.
//!
//! Install: `pip install -e crates/backreaction-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from backreaction_kernel import RustBackreactionCalculator, StateSnapshot
//!
//! calc = RustBackreactionCalculator()
//! beta, diag = calc.compute(StateSnapshot(field_strength=1.0, velocity=3e7))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use backreaction_core::{create_enhanced_calculator, BackreactionCalculator};
use backreaction_types::{BackreactionConfig, Diagnostics, StateSnapshot};

// ─── PyBackreactionConfig ───────────────────────────────────────────

/// Python-visible calculator configuration.
#[pyclass(name = "BackreactionConfig")]
#[derive(Clone)]
struct PyBackreactionConfig {
    inner: BackreactionConfig,
}

#[pymethods]
impl PyBackreactionConfig {
    #[new]
    #[pyo3(signature = (
        baseline_beta = 1.9443254780147017,
        enable_dynamic_calculation = true,
        enable_field_correction = true,
        enable_velocity_correction = true,
        enable_curvature_correction = true,
        enable_secondary_correction = true,
        field_scale = 1.0,
        field_saturation = 10.0,
        max_field_enhancement = 2.0,
        reference_speed = 299_792_458.0,
        max_velocity_fraction = 0.99,
        relativistic_threshold = 0.1,
        curvature_scale = 1.0,
        curvature_saturation = 100.0,
        curvature_gain = 0.3,
        max_curvature_enhancement = 2.5,
        secondary_scale = 1.0,
        min_beta = 0.5,
        max_beta = 5.0,
        time_constant = 0.1,
        time_step = 0.01,
        history_size = 100,
        enable_caching = true,
        cache_size = 1000,
        cache_tolerance = 1e-6,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        baseline_beta: f64,
        enable_dynamic_calculation: bool,
        enable_field_correction: bool,
        enable_velocity_correction: bool,
        enable_curvature_correction: bool,
        enable_secondary_correction: bool,
        field_scale: f64,
        field_saturation: f64,
        max_field_enhancement: f64,
        reference_speed: f64,
        max_velocity_fraction: f64,
        relativistic_threshold: f64,
        curvature_scale: f64,
        curvature_saturation: f64,
        curvature_gain: f64,
        max_curvature_enhancement: f64,
        secondary_scale: f64,
        min_beta: f64,
        max_beta: f64,
        time_constant: f64,
        time_step: f64,
        history_size: usize,
        enable_caching: bool,
        cache_size: usize,
        cache_tolerance: f64,
    ) -> PyResult<Self> {
        let config = BackreactionConfig {
            baseline_beta,
            enable_dynamic_calculation,
            enable_field_correction,
            enable_velocity_correction,
            enable_curvature_correction,
            enable_secondary_correction,
            field_scale,
            field_saturation,
            max_field_enhancement,
            reference_speed,
            max_velocity_fraction,
            relativistic_threshold,
            curvature_scale,
            curvature_saturation,
            curvature_gain,
            max_curvature_enhancement,
            secondary_scale,
            min_beta,
            max_beta,
            time_constant,
            time_step,
            history_size,
            enable_caching,
            cache_size,
            cache_tolerance,
        };
        config
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string. Missing fields take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = BackreactionConfig::from_json(json)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        config
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner: config })
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner
            .to_json()
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn baseline_beta(&self) -> f64 {
        self.inner.baseline_beta
    }

    #[getter]
    fn min_beta(&self) -> f64 {
        self.inner.min_beta
    }

    #[getter]
    fn max_beta(&self) -> f64 {
        self.inner.max_beta
    }

    #[getter]
    fn field_scale(&self) -> f64 {
        self.inner.field_scale
    }

    #[getter]
    fn field_saturation(&self) -> f64 {
        self.inner.field_saturation
    }

    #[getter]
    fn reference_speed(&self) -> f64 {
        self.inner.reference_speed
    }

    #[getter]
    fn relativistic_threshold(&self) -> f64 {
        self.inner.relativistic_threshold
    }

    #[getter]
    fn curvature_saturation(&self) -> f64 {
        self.inner.curvature_saturation
    }

    #[getter]
    fn curvature_gain(&self) -> f64 {
        self.inner.curvature_gain
    }

    #[getter]
    fn smoothing_alpha(&self) -> f64 {
        self.inner.smoothing_alpha()
    }

    fn __repr__(&self) -> String {
        format!(
            "BackreactionConfig(baseline={}, bounds=[{}, {}], dynamic={}, caching={})",
            self.inner.baseline_beta,
            self.inner.min_beta,
            self.inner.max_beta,
            self.inner.enable_dynamic_calculation,
            self.inner.enable_caching
        )
    }
}

// ─── PyStateSnapshot ────────────────────────────────────────────────

/// Python-visible input state for one evaluation.
#[pyclass(name = "StateSnapshot")]
#[derive(Clone)]
struct PyStateSnapshot {
    inner: StateSnapshot,
}

#[pymethods]
impl PyStateSnapshot {
    #[new]
    #[pyo3(signature = (
        field_strength = 0.0,
        velocity = 0.0,
        curvature = 0.0,
        mu = 0.0,
        timestamp = 0.0,
        dt = 0.0,
    ))]
    fn new(
        field_strength: f64,
        velocity: f64,
        curvature: f64,
        mu: f64,
        timestamp: f64,
        dt: f64,
    ) -> Self {
        Self {
            inner: StateSnapshot::new(field_strength, velocity, curvature, mu)
                .with_timestamp(timestamp)
                .with_dt(dt),
        }
    }

    #[getter]
    fn field_strength(&self) -> f64 {
        self.inner.field_strength
    }

    #[getter]
    fn velocity(&self) -> f64 {
        self.inner.velocity
    }

    #[getter]
    fn curvature(&self) -> f64 {
        self.inner.curvature
    }

    #[getter]
    fn mu(&self) -> f64 {
        self.inner.mu
    }

    #[getter]
    fn timestamp(&self) -> f64 {
        self.inner.timestamp
    }

    #[getter]
    fn dt(&self) -> f64 {
        self.inner.dt
    }

    fn __repr__(&self) -> String {
        format!(
            "StateSnapshot(field={}, velocity={}, curvature={}, mu={})",
            self.inner.field_strength, self.inner.velocity, self.inner.curvature, self.inner.mu
        )
    }
}

// ─── PyDiagnostics ──────────────────────────────────────────────────

/// Python-visible explanation of one computed coefficient.
#[pyclass(name = "Diagnostics")]
#[derive(Clone)]
struct PyDiagnostics {
    inner: Diagnostics,
}

#[pymethods]
impl PyDiagnostics {
    #[getter]
    fn final_beta(&self) -> f64 {
        self.inner.final_beta
    }

    #[getter]
    fn baseline_beta(&self) -> f64 {
        self.inner.baseline_beta
    }

    #[getter]
    fn enhancement_ratio(&self) -> f64 {
        self.inner.enhancement_ratio
    }

    #[getter]
    fn safety_constraint_applied(&self) -> bool {
        self.inner.safety_constraint_applied
    }

    #[getter]
    fn cache_hit(&self) -> bool {
        self.inner.cache_hit
    }

    #[getter]
    fn dynamic_calculation(&self) -> bool {
        self.inner.dynamic_calculation
    }

    #[getter]
    fn computation_time_ms(&self) -> f64 {
        self.inner.computation_time_ms
    }

    /// Per-factor contributions keyed by factor name.
    #[getter]
    fn components<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for (kind, value) in &self.inner.components {
            dict.set_item(kind.name(), *value)?;
        }
        Ok(dict)
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("components", self.components(py)?)?;
        dict.set_item("baseline_beta", self.inner.baseline_beta)?;
        dict.set_item("final_beta", self.inner.final_beta)?;
        dict.set_item("enhancement_ratio", self.inner.enhancement_ratio)?;
        dict.set_item(
            "safety_constraint_applied",
            self.inner.safety_constraint_applied,
        )?;
        dict.set_item("cache_hit", self.inner.cache_hit)?;
        dict.set_item("dynamic_calculation", self.inner.dynamic_calculation)?;
        dict.set_item("computation_time_ms", self.inner.computation_time_ms)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Diagnostics(final_beta={:.6}, ratio={:.4}, clamped={}, cache_hit={})",
            self.inner.final_beta,
            self.inner.enhancement_ratio,
            self.inner.safety_constraint_applied,
            self.inner.cache_hit
        )
    }
}

// ─── RustBackreactionCalculator ─────────────────────────────────────

/// Adaptive backreaction coefficient calculator exposed to Python.
#[pyclass(name = "RustBackreactionCalculator")]
struct PyBackreactionCalculator {
    inner: BackreactionCalculator,
}

#[pymethods]
impl PyBackreactionCalculator {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyBackreactionConfig>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        let inner =
            BackreactionCalculator::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Compute the coefficient for one state.
    ///
    /// Returns:
    ///     (beta, Diagnostics)
    fn compute(&mut self, state: &PyStateSnapshot) -> (f64, PyDiagnostics) {
        let (value, diagnostics) = self.inner.compute(&state.inner);
        (value, PyDiagnostics { inner: diagnostics })
    }

    fn get_performance_summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let s = self.inner.performance_summary();
        let dict = PyDict::new(py);
        dict.set_item("total_calls", s.total_calls)?;
        dict.set_item("cache_hits", s.cache_hits)?;
        dict.set_item("computed_calls", s.computed_calls)?;
        dict.set_item("cache_hit_rate", s.cache_hit_rate)?;
        dict.set_item("total_compute_time_ms", s.total_compute_time_ms)?;
        dict.set_item("avg_compute_time_ms", s.avg_compute_time_ms)?;
        dict.set_item("min_beta_seen", s.min_beta_seen)?;
        dict.set_item("max_beta_seen", s.max_beta_seen)?;
        dict.set_item("cache_size", s.cache_size)?;
        dict.set_item("history_len", s.history_len)?;
        Ok(dict)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    #[getter]
    fn config(&self) -> PyBackreactionConfig {
        PyBackreactionConfig {
            inner: self.inner.config().clone(),
        }
    }

    fn cache_len(&self) -> usize {
        self.inner.cache_len()
    }

    fn history_len(&self) -> usize {
        self.inner.history_len()
    }
}

/// Calculator with every correction enabled.
#[pyfunction]
#[pyo3(name = "create_enhanced_calculator", signature = (
    baseline_beta = 1.9443254780147017,
    secondary_scale = 1.0,
    max_velocity_fraction = 0.99,
))]
fn py_create_enhanced_calculator(
    baseline_beta: f64,
    secondary_scale: f64,
    max_velocity_fraction: f64,
) -> PyResult<PyBackreactionCalculator> {
    let inner = create_enhanced_calculator(baseline_beta, secondary_scale, max_velocity_fraction)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(PyBackreactionCalculator { inner })
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn backreaction_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBackreactionConfig>()?;
    m.add_class::<PyStateSnapshot>()?;
    m.add_class::<PyDiagnostics>()?;
    m.add_class::<PyBackreactionCalculator>()?;
    m.add_function(wrap_pyfunction!(py_create_enhanced_calculator, m)?)?;
    m.add("EXACT_BACKREACTION_BETA", backreaction_types::EXACT_BACKREACTION_BETA)?;
    Ok(())
}
