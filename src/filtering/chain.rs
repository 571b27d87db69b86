//! filtering::chain — forward filtering over an ordered chain of stages.
//!
//! Purpose
//! -------
//! Compute, for each stage of an ordered sequence, the filtered marginal
//! distribution over a fixed discrete state space, given a transition model,
//! an optional prior and per-stage hard or soft observations.
//!
//! Key behaviors
//! -------------
//! - Initialize the belief from the prior (normalized over the state space;
//!   uniform when absent or massless).
//! - Fold the first stage's likelihood into the prior directly, with no
//!   transition step: `α₀ ∝ L₀ ⊙ prior`.
//! - For every later stage predict with the transposed transition matrix and
//!   fold in that stage's likelihood: `αₜ ∝ Lₜ ⊙ (Tᵀ · αₜ₋₁)`.
//! - Recover from zero-mass products with the uniform distribution, log the
//!   event at debug level and record the stage in
//!   [`ChainOutcome::fallback_stages`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every posterior row of a [`ChainOutcome`] is non-negative and sums to 1
//!   within `PROB_TOL`.
//! - All validation (state space, stages, transition shape/entries, prior and
//!   soft weights, optional row sums) happens before the first stage; a run
//!   either returns every stage or fails without partial output.
//! - The run is deterministic and keeps no state between calls.
//!
//! Conventions
//! -----------
//! - Belief vectors are `Array1<f64>` in state-space order; the per-stage
//!   record is a `stages × states` `Array2<f64>`.
//! - Stages missing from `emissions_by_stage` are unobserved.
//!
//! Downstream usage
//! ----------------
//! - Call [`run_chain`] (or [`run_chain_with`] for explicit
//!   [`FilterOptions`]) and read posteriors with [`ChainOutcome::posterior`],
//!   [`ChainOutcome::marginal`] or [`ChainOutcome::prob`].
//! - Feed [`ChainOutcome::marginal`] values of several binary capacity chains
//!   into `resilience::rule_resilience_emission_gb` to drive an aggregate
//!   chain.
//!
//! Testing notes
//! -------------
//! - Unit tests below pin the documented scenarios: uniform start without a
//!   prior, hard-evidence collapse, degenerate recovery on an absorbing
//!   chain, the two-stage end-to-end example, and a normalization sweep.
use crate::filtering::emission::Emission;
use crate::filtering::errors::{FilterError, FilterResult};
use crate::filtering::options::FilterOptions;
use crate::filtering::states::StateSpace;
use crate::filtering::transition::TransitionMatrix;
use crate::filtering::validation::{validate_emissions, validate_prior, validate_stages};
use crate::numerical_stability::normalize_or_uniform;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashMap;
use tracing::{debug, trace};

/// ChainOutcome — per-stage posteriors of one filter run.
///
/// Fields
/// ------
/// - `stages`: stage ids in filtering order.
/// - `states`: the state space shared by all stages.
/// - `alphas`: `stages.len() × states.len()` matrix; row `t` is the posterior
///   at stage `t`.
/// - `fallbacks`: indices of stages whose belief lost all mass and was reset
///   to uniform.
///
/// Invariants
/// ----------
/// - Each row of `alphas` is non-negative and sums to 1 within `PROB_TOL`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    stages: Vec<String>,
    states: StateSpace,
    alphas: Array2<f64>,
    fallbacks: Vec<usize>,
}

impl ChainOutcome {
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn states(&self) -> &StateSpace {
        &self.states
    }

    /// All posteriors as a `stages × states` matrix.
    pub fn alphas(&self) -> ArrayView2<'_, f64> {
        self.alphas.view()
    }

    fn stage_index(&self, stage: &str) -> Option<usize> {
        self.stages.iter().position(|s| s == stage)
    }

    /// Posterior vector at `stage`, in state-space order.
    pub fn alpha(&self, stage: &str) -> Option<ArrayView1<'_, f64>> {
        self.stage_index(stage).map(|t| self.alphas.row(t))
    }

    /// Posterior probability of `state` at `stage`.
    pub fn prob(&self, stage: &str, state: &str) -> Option<f64> {
        let t = self.stage_index(stage)?;
        let j = self.states.index_of(state)?;
        Some(self.alphas[[t, j]])
    }

    /// Posterior at `stage` as ordered `(label, probability)` pairs.
    pub fn posterior(&self, stage: &str) -> Option<Vec<(&str, f64)>> {
        let row = self.alpha(stage)?;
        Some(self.states.labels().iter().map(String::as_str).zip(row.iter().copied()).collect())
    }

    /// Posterior at `stage` as a label → probability map.
    pub fn marginal(&self, stage: &str) -> Option<HashMap<String, f64>> {
        let row = self.alpha(stage)?;
        Some(self.states.labels().iter().cloned().zip(row.iter().copied()).collect())
    }

    /// Label with the highest posterior at `stage`; ties go to the earlier
    /// state.
    pub fn most_likely(&self, stage: &str) -> Option<&str> {
        let row = self.alpha(stage)?;
        let mut best = 0;
        for (j, &p) in row.iter().enumerate() {
            if p > row[best] {
                best = j;
            }
        }
        Some(self.states.labels()[best].as_str())
    }

    /// `(stage, posterior)` pairs in filtering order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> + '_ {
        self.stages.iter().map(String::as_str).zip(self.alphas.rows())
    }

    /// Stages whose belief was reset to uniform after losing all mass.
    pub fn fallback_stages(&self) -> Vec<&str> {
        self.fallbacks.iter().map(|&t| self.stages[t].as_str()).collect()
    }
}

/// Run the forward filter with default [`FilterOptions`].
///
/// Parameters
/// ----------
/// - `stages`: `&[S]`
///   Ordered, distinct stage ids; at least one.
/// - `states`: `&[S]`
///   Ordered, distinct state labels; at least one.
/// - `transition`: `&Array2<f64>`
///   `|states| × |states|` matrix with `T[i][j] = P(i → j)`; entries finite
///   and non-negative. Rows are expected (not required) to sum to 1.
/// - `alpha0`: `Option<&HashMap<String, f64>>`
///   Prior weights over (a subset of) the states; missing labels weigh 0.
///   `None` or an all-zero prior means uniform.
/// - `emissions_by_stage`: `&HashMap<String, Emission>`
///   Evidence per stage id; stages without an entry are unobserved.
///
/// Returns
/// -------
/// `FilterResult<ChainOutcome>`
///   Posteriors for every stage in `stages` order.
///
/// Errors
/// ------
/// - `FilterError::EmptyStateSpace` / `DuplicateState` for bad `states`.
/// - `FilterError::EmptyStages` / `DuplicateStage` for bad `stages`.
/// - `FilterError::TransitionDimMismatch` / `InvalidTransition` for a
///   malformed transition matrix.
/// - `FilterError::InvalidPrior` / `InvalidSoftWeight` for negative or
///   non-finite weights.
///
/// Panics
/// ------
/// - Never panics; degenerate stages are recovered with the uniform
///   distribution instead.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use scenario_dbn::filtering::{Emission, run_chain};
/// use std::collections::HashMap;
///
/// let t = array![[0.9, 0.1], [0.2, 0.8]];
/// let prior: HashMap<String, f64> = [("Low".to_string(), 1.0)].into_iter().collect();
/// let mut emissions = HashMap::new();
/// emissions.insert("t1".to_string(), Emission::hard("High"));
///
/// let out = run_chain(&["t0", "t1"], &["Low", "High"], &t, Some(&prior), &emissions).unwrap();
/// assert_eq!(out.prob("t0", "Low"), Some(1.0));
/// assert_eq!(out.prob("t1", "High"), Some(1.0));
/// ```
pub fn run_chain<S: AsRef<str>>(
    stages: &[S], states: &[S], transition: &Array2<f64>, alpha0: Option<&HashMap<String, f64>>,
    emissions_by_stage: &HashMap<String, Emission>,
) -> FilterResult<ChainOutcome> {
    run_chain_with(stages, states, transition, alpha0, emissions_by_stage, &FilterOptions::default())
}

/// Run the forward filter with explicit [`FilterOptions`].
///
/// Identical to [`run_chain`] except that `options.row_sum_tol() == Some(tol)`
/// additionally rejects non-stochastic transition rows with
/// `FilterError::NonStochasticRow`.
pub fn run_chain_with<S: AsRef<str>>(
    stages: &[S], states: &[S], transition: &Array2<f64>, alpha0: Option<&HashMap<String, f64>>,
    emissions_by_stage: &HashMap<String, Emission>, options: &FilterOptions,
) -> FilterResult<ChainOutcome> {
    let states = StateSpace::new(states)?;
    let stages = validate_stages(stages)?;
    let transition = TransitionMatrix::new(transition.clone(), states.len())?;
    if let Some(tol) = options.row_sum_tol() {
        transition.check_row_sums(tol)?;
    }
    if let Some(prior) = alpha0 {
        validate_prior(prior)?;
    }
    validate_emissions(emissions_by_stage)?;

    Ok(filter(stages, states, &transition, alpha0, emissions_by_stage))
}

/// One forward step: `normalize(likelihood ⊙ (Tᵀ · alpha_prev))`.
///
/// Falls back to the uniform distribution when the product has zero mass and
/// logs the event at debug level. Use [`forward_step_with_fallback`] to get
/// the fallback flag back.
///
/// # Errors
/// - [`FilterError::VectorDimMismatch`] if `alpha_prev` or `likelihood` does
///   not have `transition.n_states()` entries.
pub fn forward_step(
    alpha_prev: &Array1<f64>, transition: &TransitionMatrix, likelihood: &Array1<f64>,
) -> FilterResult<Array1<f64>> {
    let (alpha, _) = forward_step_with_fallback(alpha_prev, transition, likelihood)?;
    Ok(alpha)
}

/// [`forward_step`] that also reports whether the uniform fallback was taken.
///
/// Returns
/// -------
/// `FilterResult<(Array1<f64>, bool)>`
///   The new belief and `true` if the product had zero mass.
pub fn forward_step_with_fallback(
    alpha_prev: &Array1<f64>, transition: &TransitionMatrix, likelihood: &Array1<f64>,
) -> FilterResult<(Array1<f64>, bool)> {
    let n = transition.n_states();
    if alpha_prev.len() != n {
        return Err(FilterError::VectorDimMismatch {
            name: "alpha_prev",
            expected: n,
            found: alpha_prev.len(),
        });
    }
    if likelihood.len() != n {
        return Err(FilterError::VectorDimMismatch {
            name: "likelihood",
            expected: n,
            found: likelihood.len(),
        });
    }
    let (alpha, fell_back) = fuse(likelihood, transition.predict(alpha_prev));
    if fell_back {
        debug!("forward step belief has zero mass; reset to uniform");
    }
    Ok((alpha, fell_back))
}

// ---- Helper Methods ----

/// Recursion body; inputs are already validated.
fn filter(
    stages: Vec<String>, states: StateSpace, transition: &TransitionMatrix,
    alpha0: Option<&HashMap<String, f64>>, emissions_by_stage: &HashMap<String, Emission>,
) -> ChainOutcome {
    let mut alphas = Array2::zeros((stages.len(), states.len()));
    let mut fallbacks = Vec::new();
    let mut alpha = initial_belief(&states, alpha0);

    for (t, stage) in stages.iter().enumerate() {
        let likelihood = match emissions_by_stage.get(stage) {
            Some(emission) => emission.likelihood(&states, stage),
            None => states.ones(),
        };
        let belief = if t == 0 { alpha } else { transition.predict(&alpha) };
        let (next, fell_back) = fuse(&likelihood, belief);
        if fell_back {
            debug!(stage = %stage, "belief has zero mass; reset to uniform");
            fallbacks.push(t);
        }
        trace!(stage = %stage, alpha = ?next.as_slice(), "stage filtered");
        alphas.row_mut(t).assign(&next);
        alpha = next;
    }

    ChainOutcome { stages, states, alphas, fallbacks }
}

/// Prior normalized over `states`; uniform if absent or massless.
fn initial_belief(states: &StateSpace, alpha0: Option<&HashMap<String, f64>>) -> Array1<f64> {
    let Some(prior) = alpha0 else {
        return states.uniform();
    };
    if let Some(unknown) = prior.keys().find(|k| !states.contains(k)) {
        debug!(label = %unknown, "prior names an unknown state; ignored");
    }
    let mut belief = states.gather(prior);
    if normalize_or_uniform(&mut belief) {
        debug!("prior has zero mass on the state space; using uniform");
    }
    belief
}

/// Element-wise product followed by normalization. The flag reports a
/// uniform fallback.
fn fuse(likelihood: &Array1<f64>, belief: Array1<f64>) -> (Array1<f64>, bool) {
    let mut alpha = belief * likelihood;
    let fell_back = normalize_or_uniform(&mut alpha);
    (alpha, fell_back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical_stability::PROB_TOL;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Uniform initialization without a prior.
    // - Hard-evidence collapse at the first stage.
    // - Uniform recovery when a hard observation is impossible.
    // - The two-stage Low/High example end to end.
    // - Normalization of every posterior over a longer, mixed-evidence run.
    // - Upfront validation (no partial output) and `forward_step` shape
    //   checks.
    //
    // They intentionally DO NOT cover:
    // - Deriving soft emissions from capacity marginals (see `resilience`).
    // -------------------------------------------------------------------------

    fn prior(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn emissions(pairs: Vec<(&str, Emission)>) -> HashMap<String, Emission> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    // Purpose
    // -------
    // Verify that with no prior and no first-stage evidence the first
    // posterior is uniform.
    //
    // Given
    // -----
    // - Three states, identity transition, no prior, no emissions.
    //
    // Expect
    // ------
    // - Stage "s0" posterior is [1/3, 1/3, 1/3] and no fallback is recorded.
    fn run_chain_without_prior_starts_uniform() {
        // Arrange
        let t = Array2::eye(3);

        // Act
        let out = run_chain(&["s0", "s1"], &["Low", "Medium", "High"], &t, None, &HashMap::new())
            .expect("valid inputs");

        // Assert
        for p in out.alpha("s0").expect("stage exists").iter() {
            assert_abs_diff_eq!(*p, 1.0 / 3.0, epsilon = PROB_TOL);
        }
        assert!(out.fallback_stages().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a hard first-stage observation overrides any prior.
    //
    // Given
    // -----
    // - States [Low, High], prior {Low: 0.9, High: 0.1}.
    // - Stage t0 observed hard "High".
    //
    // Expect
    // ------
    // - Posterior at t0 is {Low: 0, High: 1}.
    fn run_chain_hard_first_observation_collapses_posterior() {
        // Arrange
        let t = array![[0.5, 0.5], [0.5, 0.5]];
        let alpha0 = prior(&[("Low", 0.9), ("High", 0.1)]);
        let ems = emissions(vec![("t0", Emission::hard("High"))]);

        // Act
        let out = run_chain(&["t0"], &["Low", "High"], &t, Some(&alpha0), &ems)
            .expect("valid inputs");

        // Assert
        assert_eq!(out.prob("t0", "Low"), Some(0.0));
        assert_eq!(out.prob("t0", "High"), Some(1.0));
        assert_eq!(out.most_likely("t0"), Some("High"));
    }

    #[test]
    // Purpose
    // -------
    // Check the recovery policy when evidence contradicts an absorbing chain.
    //
    // Given
    // -----
    // - T = identity, prior {Low: 1, High: 0}.
    // - Stage "t1" observed hard "High" (impossible after prediction).
    //
    // Expect
    // ------
    // - Posterior at t1 is {Low: 0.5, High: 0.5}, finite, and t1 is listed
    //   as a fallback stage.
    fn run_chain_impossible_observation_recovers_uniform() {
        // Arrange
        let t = array![[1.0, 0.0], [0.0, 1.0]];
        let alpha0 = prior(&[("Low", 1.0), ("High", 0.0)]);
        let ems = emissions(vec![("t1", Emission::hard("High"))]);

        // Act
        let out = run_chain(&["t0", "t1"], &["Low", "High"], &t, Some(&alpha0), &ems)
            .expect("valid inputs");

        // Assert
        assert_eq!(out.prob("t0", "Low"), Some(1.0));
        assert_abs_diff_eq!(out.prob("t1", "Low").unwrap(), 0.5, epsilon = PROB_TOL);
        assert_abs_diff_eq!(out.prob("t1", "High").unwrap(), 0.5, epsilon = PROB_TOL);
        assert_eq!(out.fallback_stages(), vec!["t1"]);
    }

    #[test]
    // Purpose
    // -------
    // Reproduce the two-stage worked example step by step.
    //
    // Given
    // -----
    // - States [Low, High], T = [[0.9, 0.1], [0.2, 0.8]].
    // - Prior {Low: 1, High: 0}; t0 unobserved, t1 hard "High".
    //
    // Expect
    // ------
    // - t0 = {Low: 1, High: 0}.
    // - pred at t1 = [0.9, 0.1]; product [0, 0.1]; t1 = {Low: 0, High: 1}.
    fn run_chain_two_stage_example_matches_hand_computation() {
        // Arrange
        let t = array![[0.9, 0.1], [0.2, 0.8]];
        let alpha0 = prior(&[("Low", 1.0), ("High", 0.0)]);
        let ems = emissions(vec![("t0", Emission::NoObservation), ("t1", Emission::hard("High"))]);

        // Act
        let out = run_chain(&["t0", "t1"], &["Low", "High"], &t, Some(&alpha0), &ems)
            .expect("valid inputs");

        // Assert
        assert_eq!(out.posterior("t0"), Some(vec![("Low", 1.0), ("High", 0.0)]));
        let t1 = out.alpha("t1").expect("stage exists");
        assert_abs_diff_eq!(t1[0], 0.0, epsilon = PROB_TOL);
        assert_abs_diff_eq!(t1[1], 1.0, epsilon = PROB_TOL);

        let tm = TransitionMatrix::new(t.clone(), 2).expect("valid T");
        let pred = tm.predict(&array![1.0, 0.0]);
        assert_abs_diff_eq!(pred[0], 0.9, epsilon = 1e-15);
        assert_abs_diff_eq!(pred[1], 0.1, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Sweep a longer run mixing all evidence kinds and check that every
    // posterior is a probability vector, in stage order.
    //
    // Given
    // -----
    // - Three states, a non-trivial stochastic T, partial prior.
    // - Stages with hard, soft, empty-soft, unknown-label and missing
    //   evidence.
    //
    // Expect
    // ------
    // - Every row is non-negative and sums to 1 within 1e-9.
    // - `iter()` yields stages in input order.
    fn run_chain_every_posterior_is_normalized() {
        // Arrange
        let stages = ["s0", "s1", "s2", "s3", "s4", "s5"];
        let t = array![[0.7, 0.2, 0.1], [0.15, 0.7, 0.15], [0.05, 0.25, 0.7]];
        let alpha0 = prior(&[("Medium", 2.0), ("High", 1.0)]);
        let ems = emissions(vec![
            ("s0", Emission::soft([("Low", 0.2), ("Medium", 0.5), ("High", 0.3)])),
            ("s1", Emission::hard("High")),
            ("s2", Emission::SoftObservation(HashMap::new())),
            ("s3", Emission::hard("Severe")),
            ("s5", Emission::soft([("Low", 3.0)])),
        ]);

        // Act
        let out = run_chain(&stages, &["Low", "Medium", "High"], &t, Some(&alpha0), &ems)
            .expect("valid inputs");

        // Assert
        let seen: Vec<&str> = out.iter().map(|(s, _)| s).collect();
        assert_eq!(seen, stages.to_vec());
        for (stage, row) in out.iter() {
            assert!(row.iter().all(|&p| p >= 0.0), "negative entry at {stage}");
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = PROB_TOL);
        }
        assert_eq!(out.prob("s1", "High"), Some(1.0));
        assert_eq!(out.prob("s5", "Low"), Some(1.0));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a transition matrix of the wrong size fails before any
    // stage is filtered.
    //
    // Given
    // -----
    // - Two states and a 3×3 matrix.
    //
    // Expect
    // ------
    // - `TransitionDimMismatch { expected: 2, found: (3, 3) }`.
    fn run_chain_wrong_transition_shape_fails_loudly() {
        // Arrange
        let t = Array2::eye(3);

        // Act
        let err = run_chain(&["t0"], &["Low", "High"], &t, None, &HashMap::new()).unwrap_err();

        // Assert
        assert_eq!(err, FilterError::TransitionDimMismatch { expected: 2, found: (3, 3) });
    }

    #[test]
    // Purpose
    // -------
    // Verify that the strict row-sum option rejects non-stochastic rows
    // while the default run tolerates them and still normalizes.
    //
    // Given
    // -----
    // - T = [[0.5, 0.2], [0.3, 0.3]] (rows sum to 0.7 and 0.6).
    //
    // Expect
    // ------
    // - Default run succeeds with normalized posteriors.
    // - Strict run fails with `NonStochasticRow { row: 0, .. }`.
    fn run_chain_with_strict_options_rejects_non_stochastic_rows() {
        // Arrange
        let t = array![[0.5, 0.2], [0.3, 0.3]];
        let strict = FilterOptions::strict(1e-9).expect("valid tol");

        // Act
        let lax = run_chain(&["t0", "t1"], &["Low", "High"], &t, None, &HashMap::new());
        let err = run_chain_with(&["t0", "t1"], &["Low", "High"], &t, None, &HashMap::new(), &strict)
            .unwrap_err();

        // Assert
        let lax = lax.expect("default options accept non-stochastic rows");
        assert_abs_diff_eq!(lax.alpha("t1").unwrap().sum(), 1.0, epsilon = PROB_TOL);
        assert!(matches!(err, FilterError::NonStochasticRow { row: 0, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Check that a prior with no mass on the state space falls back to
    // uniform.
    //
    // Given
    // -----
    // - Prior {Low: 0, Other: 5} over states [Low, High].
    //
    // Expect
    // ------
    // - Stage t0 is {Low: 0.5, High: 0.5}.
    fn run_chain_massless_prior_is_uniform() {
        // Arrange
        let alpha0 = prior(&[("Low", 0.0), ("Other", 5.0)]);

        // Act
        let out = run_chain(&["t0"], &["Low", "High"], &Array2::eye(2), Some(&alpha0), &HashMap::new())
            .expect("valid inputs");

        // Assert
        assert_abs_diff_eq!(out.prob("t0", "Low").unwrap(), 0.5, epsilon = PROB_TOL);
        assert_abs_diff_eq!(out.prob("t0", "High").unwrap(), 0.5, epsilon = PROB_TOL);
    }

    #[test]
    // Purpose
    // -------
    // Verify `forward_step` against the recursion and its shape checks.
    //
    // Given
    // -----
    // - T = [[0.9, 0.1], [0.2, 0.8]], alpha_prev = [0.5, 0.5],
    //   likelihood = [1, 1].
    // - A likelihood of length 3.
    //
    // Expect
    // ------
    // - [0.55, 0.45] for the valid call.
    // - `VectorDimMismatch { name: "likelihood", expected: 2, found: 3 }`.
    fn forward_step_matches_recursion_and_checks_shapes() {
        // Arrange
        let tm = TransitionMatrix::new(array![[0.9, 0.1], [0.2, 0.8]], 2).expect("valid T");

        // Act
        let next = forward_step(&array![0.5, 0.5], &tm, &array![1.0, 1.0]).expect("valid shapes");
        let err = forward_step(&array![0.5, 0.5], &tm, &array![1.0, 1.0, 1.0]).unwrap_err();

        // Assert
        assert_abs_diff_eq!(next[0], 0.55, epsilon = 1e-15);
        assert_abs_diff_eq!(next[1], 0.45, epsilon = 1e-15);
        assert_eq!(
            err,
            FilterError::VectorDimMismatch { name: "likelihood", expected: 2, found: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Pin the behavior when hard first-stage evidence names a state the
    // prior rules out entirely.
    //
    // Given
    // -----
    // - States [Low, High], prior {Low: 1, High: 0}.
    // - Stage t0 observed hard "High".
    //
    // Expect
    // ------
    // - The product L₀ ⊙ prior has zero mass, so t0 is {Low: 0.5, High: 0.5}
    //   and t0 is listed as a fallback stage.
    fn run_chain_hard_observation_against_zero_prior_falls_back() {
        // Arrange
        let alpha0 = prior(&[("Low", 1.0), ("High", 0.0)]);
        let ems = emissions(vec![("t0", Emission::hard("High"))]);

        // Act
        let out = run_chain(&["t0"], &["Low", "High"], &Array2::eye(2), Some(&alpha0), &ems)
            .expect("valid inputs");

        // Assert
        assert_abs_diff_eq!(out.prob("t0", "Low").unwrap(), 0.5, epsilon = PROB_TOL);
        assert_abs_diff_eq!(out.prob("t0", "High").unwrap(), 0.5, epsilon = PROB_TOL);
        assert_eq!(out.fallback_stages(), vec!["t0"]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a prior with huge but finite weights keeps its proportions
    // instead of being replaced by uniform.
    //
    // Given
    // -----
    // - States [Low, Medium, High], prior {Low: 1e308, Medium: 1e308,
    //   High: 0}, no evidence.
    //
    // Expect
    // ------
    // - t0 is [0.5, 0.5, 0.0] and no fallback is recorded.
    fn run_chain_huge_prior_weights_keep_proportions() {
        // Arrange
        let alpha0 = prior(&[("Low", 1e308), ("Medium", 1e308), ("High", 0.0)]);

        // Act
        let out = run_chain(
            &["t0"], &["Low", "Medium", "High"], &Array2::eye(3), Some(&alpha0), &HashMap::new(),
        )
        .expect("valid inputs");

        // Assert
        let t0 = out.alpha("t0").expect("stage exists");
        assert_abs_diff_eq!(t0[0], 0.5, epsilon = PROB_TOL);
        assert_abs_diff_eq!(t0[1], 0.5, epsilon = PROB_TOL);
        assert_eq!(t0[2], 0.0);
        assert!(out.fallback_stages().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify that a single step reports its uniform recovery.
    //
    // Given
    // -----
    // - T = identity, alpha_prev = [1, 0], likelihood = [0, 1].
    // - The same step with likelihood = [1, 1].
    //
    // Expect
    // ------
    // - ([0.5, 0.5], true) for the impossible observation; `forward_step`
    //   returns the same vector.
    // - Flag false for the uninformative step.
    fn forward_step_with_fallback_reports_zero_mass() {
        // Arrange
        let tm = TransitionMatrix::new(Array2::eye(2), 2).expect("valid T");
        let prev = array![1.0, 0.0];

        // Act
        let (alpha, fell_back) =
            forward_step_with_fallback(&prev, &tm, &array![0.0, 1.0]).expect("valid shapes");
        let plain = forward_step(&prev, &tm, &array![0.0, 1.0]).expect("valid shapes");
        let (_, kept) =
            forward_step_with_fallback(&prev, &tm, &array![1.0, 1.0]).expect("valid shapes");

        // Assert
        assert!(fell_back);
        assert!(!kept);
        assert_abs_diff_eq!(alpha[0], 0.5, epsilon = PROB_TOL);
        assert_abs_diff_eq!(alpha[1], 0.5, epsilon = PROB_TOL);
        assert_eq!(alpha, plain);
    }
}
