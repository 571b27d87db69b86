//! Ordered state space shared by every stage of one filter run.
//!
//! A [`StateSpace`] fixes the index of each label, so belief vectors,
//! likelihood vectors and transition rows/columns all line up by position.
use crate::filtering::errors::{FilterError, FilterResult};
use crate::numerical_stability::uniform;
use ndarray::Array1;
use std::collections::{HashMap, HashSet};

/// Ordered, duplicate-free list of state labels.
///
/// Invariants
/// ----------
/// - At least one label.
/// - Labels are unique.
///
/// Both are checked by [`StateSpace::new`]; every other constructor in the
/// crate goes through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpace {
    labels: Vec<String>,
}

impl StateSpace {
    /// Build a state space from labels in the order given.
    ///
    /// # Errors
    /// - [`FilterError::EmptyStateSpace`] if `labels` is empty.
    /// - [`FilterError::DuplicateState`] on the first repeated label.
    ///
    /// # Examples
    /// ```rust
    /// # use scenario_dbn::filtering::states::StateSpace;
    /// let space = StateSpace::new(["Low", "Medium", "High"]).unwrap();
    /// assert_eq!(space.index_of("Medium"), Some(1));
    /// assert!(StateSpace::new(["Low", "Low"]).is_err());
    /// ```
    pub fn new<I, S>(labels: I) -> FilterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels.into_iter().map(|s| s.as_ref().to_string()).collect();
        if labels.is_empty() {
            return Err(FilterError::EmptyStateSpace);
        }
        let mut seen = HashSet::with_capacity(labels.len());
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(FilterError::DuplicateState { label: label.clone() });
            }
        }
        Ok(StateSpace { labels })
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false` for a validated state space; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in state-space order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of `label`, or `None` if it is not part of this space.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    /// Uniform distribution over the states.
    pub fn uniform(&self) -> Array1<f64> {
        uniform(self.len())
    }

    /// All-ones vector: the likelihood of "no information".
    pub fn ones(&self) -> Array1<f64> {
        Array1::ones(self.len())
    }

    /// Gather `weights` into a vector in state-space order, 0 for unlisted
    /// states. Keys outside the space are ignored.
    pub(crate) fn gather(&self, weights: &HashMap<String, f64>) -> Array1<f64> {
        self.labels.iter().map(|l| weights.get(l).copied().unwrap_or(0.0)).collect()
    }
}
