//! resilience::validation — input guards for the resilience rule.
//!
//! Purpose
//! -------
//! Keep the rule's preconditions in one place: a two-label output pair,
//! finite non-negative weights and a finite positive temperature.
//!
//! Conventions
//! -----------
//! - Checks run in the order state pair → temperature → weights, so the
//!   reported error for inputs with several problems is stable.
//! - Capacity names in `weights` that have no marginal are not errors; the
//!   rule treats them as "Good = 0".
use crate::resilience::errors::{ResilienceError, ResilienceResult};
use std::collections::BTreeMap;

/// Validate the output label pair.
///
/// Errors
/// ------
/// - `ResilienceError::InvalidStatePair { len }` if `states.len() != 2`.
/// - `ResilienceError::DuplicateStateLabel { label }` if both labels match.
pub fn validate_state_pair<S: AsRef<str>>(states: &[S]) -> ResilienceResult<()> {
    if states.len() != 2 {
        return Err(ResilienceError::InvalidStatePair { len: states.len() });
    }
    if states[0].as_ref() == states[1].as_ref() {
        return Err(ResilienceError::DuplicateStateLabel { label: states[0].as_ref().to_string() });
    }
    Ok(())
}

/// Validate the softmax temperature.
///
/// Errors
/// ------
/// - `ResilienceError::InvalidTemperature { value }` unless
///   `value.is_finite() && value > 0.0`.
pub fn validate_temperature(value: f64) -> ResilienceResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ResilienceError::InvalidTemperature { value });
    }
    Ok(())
}

/// Validate per-capacity weights.
///
/// Errors
/// ------
/// - `ResilienceError::InvalidWeight { node, value }` for the first (by
///   name) negative or non-finite weight.
pub fn validate_weights(weights: &BTreeMap<String, f64>) -> ResilienceResult<()> {
    for (node, &value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(ResilienceError::InvalidWeight { node: node.clone(), value });
        }
    }
    Ok(())
}
