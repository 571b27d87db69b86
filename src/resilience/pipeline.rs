//! resilience::pipeline — capacity chains feeding an aggregate resilience chain.
//!
//! Purpose
//! -------
//! Run the two-level scenario assessment end to end: filter every binary
//! capacity node over the shared stage sequence, turn the capacity marginals
//! at each stage into a soft likelihood with
//! [`rule_resilience_emission_gb`](crate::resilience::rule::rule_resilience_emission_gb),
//! then filter the resilience node with those likelihoods as evidence.
//!
//! Key behaviors
//! -------------
//! - [`CapacityChain`] bundles one capacity's full filter input (states,
//!   transition, prior, evidence) with its weight in the rule.
//! - [`ResiliencePipeline::run`] validates all wiring before filtering, so a
//!   bad capacity never yields partial output.
//! - [`PipelineOutcome`] keeps every capacity outcome, the derived per-stage
//!   resilience likelihoods and the resilience outcome.
//!
//! Invariants & assumptions
//! ------------------------
//! - All chains share the pipeline's stage sequence.
//! - Capacity state spaces have exactly two labels, one of which is "Good".
//! - The resilience chain is observed only through the derived likelihoods.
use crate::filtering::chain::{ChainOutcome, run_chain_with};
use crate::filtering::emission::Emission;
use crate::filtering::options::FilterOptions;
use crate::resilience::errors::{ResilienceError, ResilienceResult};
use crate::resilience::options::ResilienceOptions;
use crate::resilience::rule::{GOOD_LABEL, rule_resilience_emission_with};
use crate::resilience::validation::{validate_state_pair, validate_temperature, validate_weights};
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// CapacityChain — one capacity node's filter input and rule weight.
///
/// Fields
/// ------
/// - `name`: capacity id, also the key in the rule's weight map.
/// - `states`: two labels including "Good", e.g. `["Bad", "Good"]`.
/// - `transition`: `2 × 2` stage-to-stage matrix.
/// - `prior`: optional prior weights; uniform when `None`.
/// - `emissions`: evidence per stage id.
/// - `weight`: non-negative importance in the weighted mean.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityChain {
    name: String,
    states: Vec<String>,
    transition: Array2<f64>,
    prior: Option<HashMap<String, f64>>,
    emissions: HashMap<String, Emission>,
    weight: f64,
}

impl CapacityChain {
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>, states: &[S], transition: Array2<f64>, weight: f64,
    ) -> Self {
        CapacityChain {
            name: name.into(),
            states: states.iter().map(|s| s.as_ref().to_string()).collect(),
            transition,
            prior: None,
            emissions: HashMap::new(),
            weight,
        }
    }

    pub fn with_prior(mut self, prior: HashMap<String, f64>) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Record evidence for `stage`, replacing any earlier entry.
    pub fn observe(mut self, stage: impl Into<String>, emission: impl Into<Emission>) -> Self {
        self.emissions.insert(stage.into(), emission.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn check_states(&self) -> ResilienceResult<()> {
        if self.states.len() != 2 {
            return Err(ResilienceError::InvalidCapacityStates {
                node: self.name.clone(),
                reason: "expected exactly two state labels",
            });
        }
        if !self.states.iter().any(|s| s == GOOD_LABEL) {
            return Err(ResilienceError::InvalidCapacityStates {
                node: self.name.clone(),
                reason: "no \"Good\" state label",
            });
        }
        Ok(())
    }
}

/// PipelineOutcome — results of one [`ResiliencePipeline::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    capacities: BTreeMap<String, ChainOutcome>,
    emissions: HashMap<String, HashMap<String, f64>>,
    resilience: ChainOutcome,
}

impl PipelineOutcome {
    pub fn capacity(&self, name: &str) -> Option<&ChainOutcome> {
        self.capacities.get(name)
    }

    /// Capacity outcomes ordered by name.
    pub fn capacities(&self) -> impl Iterator<Item = (&str, &ChainOutcome)> + '_ {
        self.capacities.iter().map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn resilience(&self) -> &ChainOutcome {
        &self.resilience
    }

    /// Likelihood the rule derived for the resilience node at `stage`.
    pub fn resilience_emission(&self, stage: &str) -> Option<&HashMap<String, f64>> {
        self.emissions.get(stage)
    }
}

/// ResiliencePipeline — builder for the capacity → resilience assessment.
///
/// Notes
/// -----
/// - Construction never fails; every check runs in [`ResiliencePipeline::run`].
/// - A weight for a capacity name is taken from its [`CapacityChain`]; the
///   rule never sees names outside the registered chains.
#[derive(Debug, Clone, PartialEq)]
pub struct ResiliencePipeline {
    stages: Vec<String>,
    states: Vec<String>,
    transition: Array2<f64>,
    prior: Option<HashMap<String, f64>>,
    capacities: Vec<CapacityChain>,
    filter_options: FilterOptions,
    options: ResilienceOptions,
}

impl ResiliencePipeline {
    /// Start a pipeline over `stages` for a resilience node with the given
    /// two `states` (bad side first) and transition matrix.
    pub fn new<S: AsRef<str>>(stages: &[S], states: &[S], transition: Array2<f64>) -> Self {
        ResiliencePipeline {
            stages: stages.iter().map(|s| s.as_ref().to_string()).collect(),
            states: states.iter().map(|s| s.as_ref().to_string()).collect(),
            transition,
            prior: None,
            capacities: Vec::new(),
            filter_options: FilterOptions::default(),
            options: ResilienceOptions::default(),
        }
    }

    pub fn with_prior(mut self, prior: HashMap<String, f64>) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Filter options applied to every chain, capacity and resilience alike.
    pub fn with_filter_options(mut self, options: FilterOptions) -> Self {
        self.filter_options = options;
        self
    }

    pub fn with_options(mut self, options: ResilienceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn add_capacity(mut self, capacity: CapacityChain) -> Self {
        self.capacities.push(capacity);
        self
    }

    /// Filter every capacity chain, derive the resilience evidence and filter
    /// the resilience chain.
    ///
    /// Errors
    /// ------
    /// - `ResilienceError::NoCapacityChains` if no capacity was added.
    /// - `ResilienceError::DuplicateCapacity` for a repeated capacity name.
    /// - `ResilienceError::InvalidCapacityStates` for a capacity that is not
    ///   binary or lacks "Good".
    /// - `ResilienceError::InvalidStatePair`, `DuplicateStateLabel`,
    ///   `InvalidTemperature` or `InvalidWeight` from the rule's guards.
    /// - `ResilienceError::Filter` wrapping the first failing chain's
    ///   [`FilterError`](crate::filtering::FilterError).
    pub fn run(&self) -> ResilienceResult<PipelineOutcome> {
        let weights = self.validate()?;
        debug!(
            capacities = self.capacities.len(),
            stages = self.stages.len(),
            "running resilience pipeline"
        );

        let mut capacities = BTreeMap::new();
        for cap in &self.capacities {
            let outcome = run_chain_with(
                &self.stages, &cap.states, &cap.transition, cap.prior.as_ref(), &cap.emissions,
                &self.filter_options,
            )?;
            capacities.insert(cap.name.clone(), outcome);
        }

        let mut emissions = HashMap::with_capacity(self.stages.len());
        for stage in &self.stages {
            let marginals: HashMap<String, HashMap<String, f64>> = capacities
                .iter()
                .filter_map(|(name, outcome)| Some((name.clone(), outcome.marginal(stage)?)))
                .collect();
            let like = rule_resilience_emission_with(&marginals, &self.states, &weights, &self.options)?;
            emissions.insert(stage.clone(), like);
        }

        let evidence: HashMap<String, Emission> = emissions
            .iter()
            .map(|(stage, like)| (stage.clone(), Emission::SoftObservation(like.clone())))
            .collect();
        let resilience = run_chain_with(
            &self.stages, &self.states, &self.transition, self.prior.as_ref(), &evidence,
            &self.filter_options,
        )?;

        Ok(PipelineOutcome { capacities, emissions, resilience })
    }

    // ---- Helper Methods ----

    /// Wiring checks; returns the rule's weight map.
    fn validate(&self) -> ResilienceResult<BTreeMap<String, f64>> {
        if self.capacities.is_empty() {
            return Err(ResilienceError::NoCapacityChains);
        }
        validate_state_pair(&self.states)?;
        validate_temperature(self.options.temperature())?;

        let mut seen = HashSet::new();
        let mut weights = BTreeMap::new();
        for cap in &self.capacities {
            if !seen.insert(cap.name.as_str()) {
                return Err(ResilienceError::DuplicateCapacity { node: cap.name.clone() });
            }
            cap.check_states()?;
            weights.insert(cap.name.clone(), cap.weight);
        }
        validate_weights(&weights)?;
        Ok(weights)
    }
}
