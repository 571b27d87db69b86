//! Errors for the capacity-to-resilience rule and pipeline.
//!
//! [`ResilienceError`] covers rule inputs (state pair, weights, temperature)
//! and pipeline wiring (capacity chains, stage alignment). Failures from the
//! underlying chain filter are wrapped in [`ResilienceError::Filter`] so `?`
//! works across both layers.
use crate::filtering::errors::FilterError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for resilience operations.
pub type ResilienceResult<T> = Result<T, ResilienceError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ResilienceError {
    // ---- Rule inputs ----
    /// The output label pair must have exactly two entries.
    InvalidStatePair { len: usize },
    /// The two output labels must differ.
    DuplicateStateLabel { label: String },
    /// Weights must be finite and non-negative.
    InvalidWeight { node: String, value: f64 },
    /// Temperature must be finite and > 0.
    InvalidTemperature { value: f64 },
    /// A capacity's "Good" probability must be finite and in [0, 1].
    InvalidGoodProbability { node: String, value: f64 },

    // ---- Pipeline ----
    /// At least one capacity chain is required.
    NoCapacityChains,
    /// Capacity names must be unique.
    DuplicateCapacity { node: String },
    /// Capacity chains must be binary and include the "Good" label.
    InvalidCapacityStates { node: String, reason: &'static str },

    // ---- Chain filter ----
    Filter(FilterError),
}

impl std::error::Error for ResilienceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResilienceError::Filter(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResilienceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Rule inputs ----
            ResilienceError::InvalidStatePair { len } => {
                write!(f, "Resilience states must be a pair of labels; got {len}.")
            }
            ResilienceError::DuplicateStateLabel { label } => {
                write!(f, "Resilience state labels must differ; {label:?} repeats.")
            }
            ResilienceError::InvalidWeight { node, value } => write!(
                f,
                "Weight for capacity {node:?} is {value}. Must be finite and non-negative."
            ),
            ResilienceError::InvalidTemperature { value } => {
                write!(f, "Invalid temperature: {value}. Must be finite and > 0.")
            }
            ResilienceError::InvalidGoodProbability { node, value } => write!(
                f,
                "Good probability for capacity {node:?} is {value}. Must be finite and in [0, 1]."
            ),

            // ---- Pipeline ----
            ResilienceError::NoCapacityChains => {
                write!(f, "Resilience pipeline needs at least one capacity chain.")
            }
            ResilienceError::DuplicateCapacity { node } => {
                write!(f, "Capacity {node:?} is registered more than once.")
            }
            ResilienceError::InvalidCapacityStates { node, reason } => {
                write!(f, "Capacity {node:?} has an invalid state space: {reason}")
            }

            // ---- Chain filter ----
            ResilienceError::Filter(err) => write!(f, "Chain filter failed: {err}"),
        }
    }
}

impl From<FilterError> for ResilienceError {
    fn from(err: FilterError) -> Self {
        ResilienceError::Filter(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<ResilienceError> for PyErr {
    fn from(err: ResilienceError) -> PyErr {
        PyValueError::new_err(format!("ResilienceError: {err}"))
    }
}
