//! filtering::validation — shared input guards for the chain filter.
//!
//! Purpose
//! -------
//! Centralize the precondition checks that `run_chain` performs before the
//! first stage is filtered, so the recursion itself can assume well-formed
//! inputs and never fail half-way.
//!
//! Key behaviors
//! -------------
//! - Enforce a non-empty, duplicate-free stage sequence.
//! - Enforce finite, non-negative prior weights and soft-observation weights.
//! - Map every violation into a structured [`FilterError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - State-space checks live in `StateSpace::new`; transition-matrix checks in
//!   `TransitionMatrix::new`. This module covers the remaining inputs.
//! - Keys that name unknown states or stages are not errors here; the filter
//!   ignores them (and logs them at debug level where it reads them).
//!
//! Conventions
//! -----------
//! - Validation is read-only and performs no allocation beyond the returned
//!   stage list and error payloads.
//! - When several entries are invalid, which one is reported depends on map
//!   iteration order; callers should rely on the variant, not the payload
//!   identity.
use crate::filtering::emission::Emission;
use crate::filtering::errors::{FilterError, FilterResult};
use std::collections::{HashMap, HashSet};

/// Validate and own the stage sequence.
///
/// Parameters
/// ----------
/// - `stages`: ordered stage identifiers.
///
/// Returns
/// -------
/// `FilterResult<Vec<String>>`
///   The stages as owned strings, in the given order.
///
/// Errors
/// ------
/// - `FilterError::EmptyStages` if `stages` is empty.
/// - `FilterError::DuplicateStage { stage }` on the first repeated id.
pub fn validate_stages<S: AsRef<str>>(stages: &[S]) -> FilterResult<Vec<String>> {
    if stages.is_empty() {
        return Err(FilterError::EmptyStages);
    }
    let mut seen = HashSet::with_capacity(stages.len());
    let mut owned = Vec::with_capacity(stages.len());
    for stage in stages {
        let stage = stage.as_ref();
        if !seen.insert(stage) {
            return Err(FilterError::DuplicateStage { stage: stage.to_string() });
        }
        owned.push(stage.to_string());
    }
    Ok(owned)
}

/// Validate prior weights.
///
/// Errors
/// ------
/// - `FilterError::InvalidPrior { state, value }` if any weight is negative
///   or non-finite.
pub fn validate_prior(prior: &HashMap<String, f64>) -> FilterResult<()> {
    for (state, &value) in prior {
        if !value.is_finite() || value < 0.0 {
            return Err(FilterError::InvalidPrior { state: state.clone(), value });
        }
    }
    Ok(())
}

/// Validate the weights of every soft observation.
///
/// Hard observations and absent observations always pass; an unknown hard
/// label is a "no information" case, not an error.
///
/// Errors
/// ------
/// - `FilterError::InvalidSoftWeight { stage, state, value }` if any soft
///   weight is negative or non-finite.
pub fn validate_emissions(emissions_by_stage: &HashMap<String, Emission>) -> FilterResult<()> {
    for (stage, emission) in emissions_by_stage {
        if let Emission::SoftObservation(weights) = emission {
            for (state, &value) in weights {
                if !value.is_finite() || value < 0.0 {
                    return Err(FilterError::InvalidSoftWeight {
                        stage: stage.clone(),
                        state: state.clone(),
                        value,
                    });
                }
            }
        }
    }
    Ok(())
}
