//! resilience — aggregate resilience evidence from capacity marginals.
//!
//! Purpose
//! -------
//! Derive soft evidence for a two-state aggregate node (e.g.
//! ScenarioResilience) from the filtered Bad/Good marginals of its capacity
//! parents, and run the full capacity → resilience assessment on top of the
//! `filtering` chain filter.
//!
//! Key behaviors
//! -------------
//! - [`rule_resilience_emission_gb`] maps capacity marginals, weights and a
//!   temperature to a `{bad: p, good: 1 − p}` likelihood.
//! - [`ResiliencePipeline`] filters each [`CapacityChain`], applies the rule
//!   stage by stage and filters the resilience chain with the result.
//!
//! Invariants & assumptions
//! ------------------------
//! - The rule is pure and deterministic; weights iterate in name order.
//! - Temperature is finite and strictly positive; the uniform output that a
//!   zero temperature would give is only reached in the limit.
//!
//! Conventions
//! -----------
//! - Capacity marginals are keyed by label and read at [`GOOD_LABEL`].
//! - Errors are [`ResilienceError`] values; chain-filter failures arrive
//!   wrapped in [`ResilienceError::Filter`].
//!
//! Downstream usage
//! ----------------
//! - Call the rule directly with marginals from
//!   [`ChainOutcome::marginal`](crate::filtering::ChainOutcome::marginal), or
//!   build a [`ResiliencePipeline`] and read the [`PipelineOutcome`].

pub mod errors;
pub mod options;
pub mod pipeline;
pub mod rule;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ResilienceError, ResilienceResult};
pub use self::options::{DEFAULT_TEMPERATURE, ResilienceOptions};
pub use self::pipeline::{CapacityChain, PipelineOutcome, ResiliencePipeline};
pub use self::rule::{
    BAD_GOOD, GOOD_LABEL, rule_resilience_emission_gb, rule_resilience_emission_with,
};
pub use self::validation::{validate_state_pair, validate_temperature, validate_weights};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use scenario_dbn::resilience::prelude::*;
//
// to import the main resilience surface in a single line.

pub mod prelude {
    pub use super::errors::{ResilienceError, ResilienceResult};
    pub use super::options::ResilienceOptions;
    pub use super::pipeline::{CapacityChain, PipelineOutcome, ResiliencePipeline};
    pub use super::rule::rule_resilience_emission_gb;
}
