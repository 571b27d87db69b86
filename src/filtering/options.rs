//! Options for a chain-filter run.
use crate::filtering::errors::{FilterError, FilterResult};

/// FilterOptions — knobs for [`run_chain_with`](crate::filtering::chain::run_chain_with).
///
/// Fields
/// ------
/// - `row_sum_tol`: `Option<f64>`
///   `None` (default) leaves row-stochasticity of the transition matrix to the
///   caller. `Some(tol)` rejects any row whose sum differs from 1 by more than
///   `tol`, before any stage is filtered.
///
/// Invariants
/// ----------
/// - `row_sum_tol`, when present, is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterOptions {
    row_sum_tol: Option<f64>,
}

impl FilterOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`FilterError::InvalidRowSumTol`] if `row_sum_tol` is `Some` but not
    ///   finite and > 0.
    pub fn new(row_sum_tol: Option<f64>) -> FilterResult<Self> {
        if let Some(tol) = row_sum_tol {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(FilterError::InvalidRowSumTol { tol });
            }
        }
        Ok(FilterOptions { row_sum_tol })
    }

    /// Options with the strict row-sum check switched on at `tol`.
    pub fn strict(tol: f64) -> FilterResult<Self> {
        Self::new(Some(tol))
    }

    pub fn row_sum_tol(&self) -> Option<f64> {
        self.row_sum_tol
    }
}
