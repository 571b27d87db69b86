//! resilience::rule — weighted-softmax likelihood from capacity marginals.
//!
//! Purpose
//! -------
//! Turn the binary (Bad/Good) marginals of several already-filtered capacity
//! nodes into a soft likelihood over an aggregate node's two states, so the
//! aggregate chain can be driven by its parents.
//!
//! Key behaviors
//! -------------
//! - Weighted mean of each capacity's "Good" probability, 0.5 when the total
//!   weight is zero.
//! - Scores `[1 − meanGood, meanGood]` scaled by the temperature and passed
//!   through a max-shifted softmax.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output has exactly the two requested labels and sums to 1.
//! - meanGood = 0.5 gives 0.5/0.5 at any temperature; for fixed weights and
//!   temperature the output "Good" probability is strictly increasing in any
//!   positively-weighted capacity's "Good" probability.
//!
//! Conventions
//! -----------
//! - Weights are a `BTreeMap` so accumulation order, and therefore the last
//!   bit of the result, does not depend on hash seeds.
//! - A capacity listed in `weights` but absent from `cap_marginals`, or a
//!   marginal without a "Good" entry, contributes "Good = 0" at its weight.
//! - Weights are divided by the largest weight before accumulation, so any
//!   finite weights give a finite mean.
use crate::numerical_stability::stable_softmax;
use crate::resilience::errors::{ResilienceError, ResilienceResult};
use crate::resilience::options::ResilienceOptions;
use crate::resilience::validation::{validate_state_pair, validate_temperature, validate_weights};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Label looked up in each capacity marginal.
pub const GOOD_LABEL: &str = "Good";

/// Canonical output pair for the aggregate resilience node.
pub const BAD_GOOD: [&str; 2] = ["Bad", GOOD_LABEL];

/// Derive a soft likelihood for a two-state aggregate node from weighted
/// capacity marginals.
///
/// Parameters
/// ----------
/// - `cap_marginals`: `&HashMap<String, HashMap<String, f64>>`
///   Capacity name → (label → probability); each marginal is expected to
///   contain a "Good" entry.
/// - `states`: `&[S]`
///   Two distinct output labels, "bad" side first, e.g. `["Bad", "Good"]`.
/// - `weights`: `&BTreeMap<String, f64>`
///   Capacity name → non-negative importance weight. Only capacities listed
///   here take part.
/// - `temperature`: `f64`
///   Finite, strictly positive sharpness factor (1.0 is the usual default).
///
/// Returns
/// -------
/// `ResilienceResult<HashMap<String, f64>>`
///   `{states[0]: p_bad, states[1]: p_good}` with `p_bad + p_good = 1`.
///
/// Errors
/// ------
/// - `ResilienceError::InvalidStatePair` / `DuplicateStateLabel` for a bad
///   label pair.
/// - `ResilienceError::InvalidTemperature` unless `temperature > 0` and
///   finite.
/// - `ResilienceError::InvalidWeight` for a negative or non-finite weight.
/// - `ResilienceError::InvalidGoodProbability` if a weighted capacity's
///   "Good" entry is non-finite or outside `[0, 1]`.
///
/// Examples
/// --------
/// ```rust
/// use scenario_dbn::resilience::rule::{BAD_GOOD, rule_resilience_emission_gb};
/// use std::collections::{BTreeMap, HashMap};
///
/// let mut marginals = HashMap::new();
/// marginals.insert(
///     "RecoveryCapacity".to_string(),
///     HashMap::from([("Bad".to_string(), 0.5), ("Good".to_string(), 0.5)]),
/// );
/// let weights = BTreeMap::from([("RecoveryCapacity".to_string(), 2.0)]);
///
/// let like = rule_resilience_emission_gb(&marginals, &BAD_GOOD, &weights, 3.0).unwrap();
/// assert!((like["Good"] - 0.5).abs() < 1e-12);
/// ```
pub fn rule_resilience_emission_gb<S: AsRef<str>>(
    cap_marginals: &HashMap<String, HashMap<String, f64>>, states: &[S],
    weights: &BTreeMap<String, f64>, temperature: f64,
) -> ResilienceResult<HashMap<String, f64>> {
    validate_state_pair(states)?;
    validate_temperature(temperature)?;
    validate_weights(weights)?;

    let mean_good = weighted_mean_good(cap_marginals, weights)?;
    let probs = stable_softmax(&[(1.0 - mean_good) * temperature, mean_good * temperature]);

    Ok(HashMap::from([
        (states[0].as_ref().to_string(), probs[0]),
        (states[1].as_ref().to_string(), probs[1]),
    ]))
}

/// [`rule_resilience_emission_gb`] with the temperature taken from
/// [`ResilienceOptions`].
pub fn rule_resilience_emission_with<S: AsRef<str>>(
    cap_marginals: &HashMap<String, HashMap<String, f64>>, states: &[S],
    weights: &BTreeMap<String, f64>, options: &ResilienceOptions,
) -> ResilienceResult<HashMap<String, f64>> {
    rule_resilience_emission_gb(cap_marginals, states, weights, options.temperature())
}

/// Weighted mean of the "Good" probabilities; 0.5 when total weight is 0.
///
/// Weights are validated finite and non-negative by the caller.
fn weighted_mean_good(
    cap_marginals: &HashMap<String, HashMap<String, f64>>, weights: &BTreeMap<String, f64>,
) -> ResilienceResult<f64> {
    let max_weight = weights.values().copied().fold(0.0_f64, f64::max);
    if max_weight == 0.0 {
        return Ok(0.5);
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (node, &weight) in weights {
        let good = match cap_marginals.get(node).and_then(|m| m.get(GOOD_LABEL)) {
            Some(&p) if p.is_finite() && (0.0..=1.0).contains(&p) => p,
            Some(&p) => {
                return Err(ResilienceError::InvalidGoodProbability { node: node.clone(), value: p });
            }
            None => {
                debug!(node = %node, "no Good probability for capacity; using 0");
                0.0
            }
        };
        let scaled = weight / max_weight;
        weighted_sum += good * scaled;
        total_weight += scaled;
    }
    Ok(weighted_sum / total_weight)
}
