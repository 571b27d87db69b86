//! Conversion helpers between Python objects and the filtering types.
//!
//! Everything here sits behind the `python-bindings` feature and is used only
//! by the `#[pyfunction]`s in the crate root.

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray2;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyDict, PyString},
};

#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use crate::filtering::{ChainOutcome, Emission, matrix_from_rows};

/// Read a transition matrix from a 2-D `float64` NumPy array or a sequence of
/// row sequences.
///
/// Errors
/// ------
/// - `TypeError` if `raw` is neither.
/// - `ValueError` (via `FilterError`) if a nested sequence is not
///   `n_states × n_states`.
///
/// Notes
/// -----
/// - NumPy input is copied as-is; its shape is checked later by the filter.
#[cfg(feature = "python-bindings")]
pub fn extract_transition<'py>(raw: &Bound<'py, PyAny>, n_states: usize) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err("transition must be a 2-D numpy.ndarray or a sequence of float rows")
    })?;
    Ok(matrix_from_rows(&rows, n_states)?)
}

/// Map one Python evidence value to an [`Emission`]: `None` is unobserved, a
/// `str` is a hard observation and a `dict[str, float]` is soft evidence.
#[cfg(feature = "python-bindings")]
pub fn extract_emission<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Emission> {
    if raw.is_none() {
        return Ok(Emission::NoObservation);
    }
    if raw.is_instance_of::<PyString>() {
        let label: String = raw.extract()?;
        return Ok(Emission::HardObservation(label));
    }
    if raw.is_instance_of::<PyDict>() {
        let weights: HashMap<String, f64> = raw.extract().map_err(|_| {
            PyTypeError::new_err("soft observations must map state labels to floats")
        })?;
        return Ok(Emission::SoftObservation(weights));
    }
    Err(PyTypeError::new_err(format!(
        "invalid observation of type {} (expected None, str, or dict[str, float])",
        raw.get_type().name()?
    )))
}

/// Map a `dict[str, None | str | dict]` of per-stage evidence.
#[cfg(feature = "python-bindings")]
pub fn extract_emissions<'py>(
    raw: Option<&Bound<'py, PyDict>>,
) -> PyResult<HashMap<String, Emission>> {
    let mut out = HashMap::new();
    let Some(dict) = raw else {
        return Ok(out);
    };
    for (stage, value) in dict.iter() {
        let stage: String = stage
            .extract()
            .map_err(|_| PyTypeError::new_err("stage ids must be strings"))?;
        out.insert(stage, extract_emission(&value)?);
    }
    Ok(out)
}

/// Build `{stage: {state: prob}}` with stages and states in filter order.
#[cfg(feature = "python-bindings")]
pub fn outcome_to_dict<'py>(py: Python<'py>, outcome: &ChainOutcome) -> PyResult<Bound<'py, PyDict>> {
    let out = PyDict::new(py);
    for (stage, row) in outcome.iter() {
        let inner = PyDict::new(py);
        for (label, &p) in outcome.states().labels().iter().zip(row.iter()) {
            inner.set_item(label.as_str(), p)?;
        }
        out.set_item(stage, inner)?;
    }
    Ok(out)
}
