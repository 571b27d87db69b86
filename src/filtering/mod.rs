//! filtering — forward filtering over ordinal stage chains.
//!
//! Purpose
//! -------
//! Collect the chain filter and its supporting types: the ordered state
//! space, the transition model, per-stage emissions, options, validation and
//! errors. Together they compute filtered marginals `P(stateₜ | evidence₀..ₜ)`
//! for every stage of an ordered sequence.
//!
//! Key behaviors
//! -------------
//! - [`run_chain`] / [`run_chain_with`] run the full recursion and return a
//!   [`ChainOutcome`] with one posterior per stage.
//! - [`forward_step`] exposes a single predict-and-update step for callers
//!   that drive the recursion themselves.
//! - [`Emission`] models absent, hard and soft evidence as one tagged enum.
//! - [`TransitionMatrix`] and [`StateSpace`] carry shape invariants so the
//!   recursion can index without re-checking.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated once, up front; afterwards no stage can fail.
//! - A zero-mass stage is recovered with the uniform distribution, recorded
//!   on the outcome and logged with `tracing` at debug level.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray` types in state-space order;
//!   `T[i][j]` is the probability of moving from state `i` to state `j`.
//! - Errors are [`FilterError`] values returned through [`FilterResult`].
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use scenario_dbn::filtering::{ChainOutcome, Emission, FilterResult, run_chain};
//!   ```
//!
//! - The `resilience` subtree runs several capacity chains through this
//!   module and feeds their marginals back in as soft emissions.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; [`chain`] holds the scenario
//!   tests for the recursion as a whole.

pub mod chain;
pub mod emission;
pub mod errors;
pub mod options;
pub mod states;
pub mod transition;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::chain::{
    ChainOutcome, forward_step, forward_step_with_fallback, run_chain, run_chain_with,
};
pub use self::emission::Emission;
pub use self::errors::{FilterError, FilterResult};
pub use self::options::FilterOptions;
pub use self::states::StateSpace;
pub use self::transition::{TransitionMatrix, matrix_from_rows};
pub use self::validation::{validate_emissions, validate_prior, validate_stages};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use scenario_dbn::filtering::prelude::*;
//
// to import the main filtering surface in a single line.

pub mod prelude {
    pub use super::chain::{ChainOutcome, run_chain, run_chain_with};
    pub use super::emission::Emission;
    pub use super::errors::{FilterError, FilterResult};
    pub use super::options::FilterOptions;
}
