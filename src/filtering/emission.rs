//! filtering::emission — per-stage observations and their likelihood vectors.
//!
//! Purpose
//! -------
//! Model the evidence available at one stage as a tagged [`Emission`] and
//! turn it into a likelihood vector aligned with a [`StateSpace`].
//!
//! Key behaviors
//! -------------
//! - `NoObservation` contributes no information: an all-ones likelihood.
//! - `HardObservation(label)` is one-hot at `label`; a label outside the
//!   state space is treated as `NoObservation`.
//! - `SoftObservation(weights)` gathers the weight of each state (0 if
//!   unlisted) and rescales to unit mass; an empty mapping is treated as
//!   `NoObservation`, and a mapping whose listed weights are all zero on the
//!   state space falls back to the uniform vector.
//!
//! Invariants & assumptions
//! ------------------------
//! - Soft weights are finite and non-negative; `run_chain` checks this via
//!   `validation::validate_emissions` before any stage is filtered.
//! - Every likelihood vector returned here has length `states.len()` and is
//!   never all zeros.
//!
//! Conventions
//! -----------
//! - Unknown hard labels and soft keys outside the state space are logged at
//!   debug level with the stage id, not rejected.
use crate::filtering::states::StateSpace;
use crate::numerical_stability::normalize_or_uniform;
use ndarray::Array1;
use std::collections::HashMap;
use tracing::debug;

/// Evidence about the latent state at a single stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Emission {
    /// No evidence; uniform likelihood.
    #[default]
    NoObservation,
    /// The state was observed exactly.
    HardObservation(String),
    /// Graded evidence: non-negative weight per state label.
    SoftObservation(HashMap<String, f64>),
}

impl Emission {
    /// Hard observation of `label`.
    pub fn hard(label: impl Into<String>) -> Self {
        Emission::HardObservation(label.into())
    }

    /// Soft observation from `(label, weight)` pairs.
    ///
    /// ```rust
    /// # use scenario_dbn::filtering::emission::Emission;
    /// let e = Emission::soft([("Low", 0.2), ("High", 0.8)]);
    /// assert!(matches!(e, Emission::SoftObservation(ref m) if m.len() == 2));
    /// ```
    pub fn soft<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Emission::SoftObservation(weights.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Likelihood vector of this emission over `states`.
    ///
    /// Parameters
    /// ----------
    /// - `states`: state space that fixes vector order and length.
    /// - `stage`: stage identifier, used only for diagnostics.
    ///
    /// Returns
    /// -------
    /// `Array1<f64>` of length `states.len()`:
    /// - all ones for `NoObservation`, an unknown hard label, or an empty soft
    ///   mapping;
    /// - one-hot for a known hard label;
    /// - the normalized soft weights otherwise.
    pub fn likelihood(&self, states: &StateSpace, stage: &str) -> Array1<f64> {
        match self {
            Emission::NoObservation => states.ones(),
            Emission::HardObservation(label) => match states.index_of(label) {
                Some(idx) => {
                    let mut like = Array1::zeros(states.len());
                    like[idx] = 1.0;
                    like
                }
                None => {
                    debug!(stage, label = %label, "hard observation outside state space; ignored");
                    states.ones()
                }
            },
            Emission::SoftObservation(weights) => {
                if weights.is_empty() {
                    return states.ones();
                }
                if let Some(unknown) = weights.keys().find(|k| !states.contains(k)) {
                    debug!(stage, label = %unknown, "soft observation names an unknown state");
                }
                let mut like = states.gather(weights);
                if normalize_or_uniform(&mut like) {
                    debug!(stage, "soft observation has zero mass on the state space");
                }
                like
            }
        }
    }
}

impl From<&str> for Emission {
    fn from(label: &str) -> Self {
        Emission::hard(label)
    }
}

impl From<Option<&str>> for Emission {
    fn from(label: Option<&str>) -> Self {
        label.map_or(Emission::NoObservation, Emission::hard)
    }
}

impl From<HashMap<String, f64>> for Emission {
    fn from(weights: HashMap<String, f64>) -> Self {
        Emission::SoftObservation(weights)
    }
}
