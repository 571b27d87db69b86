//! filtering::errors — validation errors for the chain filter.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias returned by every public entry
//! point of the chain filter, together with a conversion layer to Python
//! exceptions when the `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - Define [`FilterResult`] and [`FilterError`] as the canonical result and
//!   error types for state-space construction, transition-model checks,
//!   prior/emission validation and the forward recursion itself.
//! - Attach human-readable `Display` messages that embed the offending label,
//!   index or value.
//! - Implement `From<FilterError> for PyErr`, mapping every variant to
//!   `ValueError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only caller contract violations become errors. A belief vector that
//!   loses all mass at some stage is recovered with the uniform distribution
//!   and is never reported through this type.
//! - All validation happens before the first stage is computed, so an
//!   `Err(FilterError)` always means "no stages were filtered".
//!
//! Conventions
//! -----------
//! - Matrix indices are 0-based and follow state-space order.
//! - Messages are phrased as domain constraints ("must be non-negative",
//!   "must be square") rather than low-level details.
//!
//! Testing notes
//! -------------
//! - Unit tests below check that `Display` messages embed their payloads.
//!   Each variant is raised for real by tests in `validation`, `states`,
//!   `transition` and `chain`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for chain-filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// FilterError — caller contract violations detected by the chain filter.
///
/// Variants
/// --------
/// - `EmptyStateSpace`
///   The state space has no labels.
/// - `DuplicateState { label }`
///   A state label appears more than once.
/// - `EmptyStages`
///   The stage sequence is empty.
/// - `DuplicateStage { stage }`
///   A stage identifier appears more than once.
/// - `TransitionDimMismatch { expected, found }`
///   The transition matrix is not `expected × expected`.
/// - `RaggedTransitionRow { row, expected, found }`
///   A row-wise matrix literal has a row of the wrong length.
/// - `InvalidTransition { row, col, value }`
///   A transition entry is negative or non-finite.
/// - `NonStochasticRow { row, sum, tol }`
///   A row does not sum to one within `tol` (only when the strict check is
///   enabled through `FilterOptions`).
/// - `InvalidRowSumTol { tol }`
///   The tolerance passed to `FilterOptions` is not finite and positive.
/// - `VectorDimMismatch { name, expected, found }`
///   A belief or likelihood vector passed to `forward_step` has the wrong
///   length.
/// - `InvalidPrior { state, value }`
///   A prior weight is negative or non-finite.
/// - `InvalidSoftWeight { stage, state, value }`
///   A soft-observation weight is negative or non-finite.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    // ---- State space / stages ----
    EmptyStateSpace,
    DuplicateState { label: String },
    EmptyStages,
    DuplicateStage { stage: String },

    // ---- Transition model ----
    TransitionDimMismatch { expected: usize, found: (usize, usize) },
    RaggedTransitionRow { row: usize, expected: usize, found: usize },
    InvalidTransition { row: usize, col: usize, value: f64 },
    NonStochasticRow { row: usize, sum: f64, tol: f64 },
    InvalidRowSumTol { tol: f64 },

    // ---- Vectors ----
    VectorDimMismatch { name: &'static str, expected: usize, found: usize },

    // ---- Prior / emissions ----
    InvalidPrior { state: String, value: f64 },
    InvalidSoftWeight { stage: String, state: String, value: f64 },
}

impl std::error::Error for FilterError {}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- State space / stages ----
            FilterError::EmptyStateSpace => {
                write!(f, "State space is empty; at least one state label is required.")
            }
            FilterError::DuplicateState { label } => {
                write!(f, "State label {label:?} appears more than once.")
            }
            FilterError::EmptyStages => {
                write!(f, "Stage sequence is empty; at least one stage is required.")
            }
            FilterError::DuplicateStage { stage } => {
                write!(f, "Stage {stage:?} appears more than once.")
            }

            // ---- Transition model ----
            FilterError::TransitionDimMismatch { expected, found } => write!(
                f,
                "Transition matrix must be {expected}x{expected}; got {}x{}.",
                found.0, found.1
            ),
            FilterError::RaggedTransitionRow { row, expected, found } => {
                write!(f, "Transition row {row} has {found} entries; expected {expected}.")
            }
            FilterError::InvalidTransition { row, col, value } => write!(
                f,
                "Transition entry ({row}, {col}) is {value}. Must be finite and non-negative."
            ),
            FilterError::NonStochasticRow { row, sum, tol } => {
                write!(f, "Transition row {row} sums to {sum}; must sum to 1 within {tol}.")
            }
            FilterError::InvalidRowSumTol { tol } => {
                write!(f, "Row-sum tolerance {tol} is invalid. Must be finite and > 0.")
            }

            // ---- Vectors ----
            FilterError::VectorDimMismatch { name, expected, found } => {
                write!(f, "Vector {name} has length {found}; expected {expected}.")
            }

            // ---- Prior / emissions ----
            FilterError::InvalidPrior { state, value } => write!(
                f,
                "Prior weight for state {state:?} is {value}. Must be finite and non-negative."
            ),
            FilterError::InvalidSoftWeight { stage, state, value } => write!(
                f,
                "Soft observation at stage {stage:?} gives state {state:?} weight {value}. \
                 Must be finite and non-negative."
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<FilterError> for PyErr {
    fn from(err: FilterError) -> PyErr {
        PyValueError::new_err(format!("FilterError: {err}"))
    }
}
