//! scenario_dbn — forward filtering for emergency-scenario stage chains.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the chain filter and the capacity-to-resilience rule to Python via
//! the `_scenario_dbn` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`filtering`, `resilience`,
//!   `numerical_stability`) as the public crate surface.
//! - With the `python-bindings` feature, define `run_chain` and
//!   `rule_resilience_emission_gb` as Python functions returning plain dicts.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file only converts
//!   arguments and maps errors.
//!
//! Conventions
//! -----------
//! - Python evidence values are `None` (unobserved), `str` (hard) or
//!   `dict[str, float]` (soft).
//! - Errors from Rust surface as `ValueError`; malformed argument types as
//!   `TypeError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should use [`filtering::run_chain`],
//!   [`resilience::rule_resilience_emission_gb`] and
//!   [`resilience::ResiliencePipeline`] directly.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each module; `tests/` drives the public Rust
//!   surface end to end.

pub mod filtering;
pub mod numerical_stability;
pub mod resilience;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyDict};

#[cfg(feature = "python-bindings")]
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "python-bindings")]
use crate::{
    filtering::{FilterOptions, run_chain_with},
    resilience::{DEFAULT_TEMPERATURE, rule_resilience_emission_gb},
    utils::{extract_emissions, extract_transition, outcome_to_dict},
};

/// run_chain — Python entry point for the forward chain filter.
///
/// Parameters
/// ----------
/// Called from Python as
/// `run_chain(stages, states, transition, alpha0=None, emissions_by_stage=None, row_sum_tol=None)`:
/// - `stages`: `list[str]`
///   Ordered, distinct stage ids.
/// - `states`: `list[str]`
///   Ordered, distinct state labels.
/// - `transition`: `&PyAny`
///   `len(states) × len(states)` float64 NumPy array or list of rows.
/// - `alpha0`: `Option<dict[str, float]>`
///   Prior weights; uniform when `None`.
/// - `emissions_by_stage`: `Option<dict[str, None | str | dict[str, float]]>`
///   Evidence per stage.
/// - `row_sum_tol`: `Option<f64>`
///   Enables the strict row-sum check.
///
/// Returns
/// -------
/// `dict[str, dict[str, float]]`
///   Posterior per stage, stages and states in input order.
///
/// Errors
/// ------
/// - `ValueError` for any `FilterError`.
/// - `TypeError` for argument values of the wrong Python type.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "run_chain")]
#[pyo3(signature = (stages, states, transition, alpha0 = None, emissions_by_stage = None, row_sum_tol = None))]
pub fn py_run_chain<'py>(
    py: Python<'py>, stages: Vec<String>, states: Vec<String>, transition: &Bound<'py, PyAny>,
    alpha0: Option<HashMap<String, f64>>, emissions_by_stage: Option<&Bound<'py, PyDict>>,
    row_sum_tol: Option<f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let transition = extract_transition(transition, states.len())?;
    let emissions = extract_emissions(emissions_by_stage)?;
    let options = FilterOptions::new(row_sum_tol)?;

    let outcome =
        run_chain_with(&stages, &states, &transition, alpha0.as_ref(), &emissions, &options)?;
    outcome_to_dict(py, &outcome)
}

/// rule_resilience_emission_gb — Python entry point for the weighted-softmax
/// resilience likelihood.
///
/// Called as
/// `rule_resilience_emission_gb(cap_marginals, states, weights, temperature=1.0)`
/// and returns `{states[0]: p_bad, states[1]: p_good}`. Invalid input raises
/// `ValueError`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "rule_resilience_emission_gb")]
#[pyo3(signature = (cap_marginals, states, weights, temperature = DEFAULT_TEMPERATURE))]
pub fn py_rule_resilience_emission_gb(
    cap_marginals: HashMap<String, HashMap<String, f64>>, states: Vec<String>,
    weights: HashMap<String, f64>, temperature: f64,
) -> PyResult<HashMap<String, f64>> {
    let weights: BTreeMap<String, f64> = weights.into_iter().collect();
    Ok(rule_resilience_emission_gb(&cap_marginals, &states, &weights, temperature)?)
}

/// _scenario_dbn — PyO3 module initializer for the Python extension.
///
/// Registers `run_chain` and `rule_resilience_emission_gb` on the module.
/// Invoked by Python on import; not called directly.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _scenario_dbn<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_run_chain, m)?)?;
    m.add_function(wrap_pyfunction!(py_rule_resilience_emission_gb, m)?)?;
    Ok(())
}
