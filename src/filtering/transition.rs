//! Transition model between consecutive stages.
//!
//! [`TransitionMatrix`] wraps a square `Array2<f64>` whose entry `(i, j)` is
//! the probability of moving from state `i` to state `j`, with rows and
//! columns in state-space order.
//!
//! Construction checks shape and entry sign/finiteness. Row-stochasticity is
//! NOT enforced unless asked for via [`TransitionMatrix::check_row_sums`]:
//! the forward recursion renormalizes at every stage, so non-stochastic rows
//! only distort, never break, the output.
use crate::filtering::errors::{FilterError, FilterResult};
use ndarray::{Array1, Array2, ArrayView2};

/// Validated square transition matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    matrix: Array2<f64>,
}

impl TransitionMatrix {
    /// Wrap `matrix` after checking it is `n_states × n_states` with finite,
    /// non-negative entries.
    ///
    /// # Errors
    /// - [`FilterError::TransitionDimMismatch`] on a shape mismatch.
    /// - [`FilterError::InvalidTransition`] on the first negative or
    ///   non-finite entry (row-major scan).
    pub fn new(matrix: Array2<f64>, n_states: usize) -> FilterResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != n_states || cols != n_states {
            return Err(FilterError::TransitionDimMismatch {
                expected: n_states,
                found: (rows, cols),
            });
        }
        for ((row, col), &value) in matrix.indexed_iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(FilterError::InvalidTransition { row, col, value });
            }
        }
        Ok(TransitionMatrix { matrix })
    }

    /// Build from row-major nested vectors, as produced by spreadsheet or
    /// knowledge-base exports.
    ///
    /// # Errors
    /// - [`FilterError::RaggedTransitionRow`] if any row length differs from
    ///   `n_states`.
    /// - Anything [`TransitionMatrix::new`] reports.
    ///
    /// # Examples
    /// ```rust
    /// # use scenario_dbn::filtering::transition::TransitionMatrix;
    /// let t = TransitionMatrix::from_rows(&[vec![0.9, 0.1], vec![0.2, 0.8]], 2).unwrap();
    /// assert_eq!(t.n_states(), 2);
    /// ```
    pub fn from_rows(rows: &[Vec<f64>], n_states: usize) -> FilterResult<Self> {
        Self::new(matrix_from_rows(rows, n_states)?, n_states)
    }

    pub fn n_states(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    /// One-step prediction `pred = Tᵀ · alpha`, i.e.
    /// `pred[j] = Σ_i alpha[i] · T[i][j]`.
    ///
    /// The caller guarantees `alpha.len() == self.n_states()`.
    pub fn predict(&self, alpha: &Array1<f64>) -> Array1<f64> {
        self.matrix.t().dot(alpha)
    }

    /// Check that every row sums to one within `tol`.
    ///
    /// # Errors
    /// - [`FilterError::NonStochasticRow`] for the first offending row.
    pub fn check_row_sums(&self, tol: f64) -> FilterResult<()> {
        for (row, r) in self.matrix.rows().into_iter().enumerate() {
            let sum = r.sum();
            if (sum - 1.0).abs() > tol {
                return Err(FilterError::NonStochasticRow { row, sum, tol });
            }
        }
        Ok(())
    }
}

/// Copy row-major nested vectors into an `n_states × n_states` array.
///
/// # Errors
/// - [`FilterError::TransitionDimMismatch`] if there are not `n_states` rows.
/// - [`FilterError::RaggedTransitionRow`] if a row has the wrong length.
pub fn matrix_from_rows(rows: &[Vec<f64>], n_states: usize) -> FilterResult<Array2<f64>> {
    if rows.len() != n_states {
        let cols = rows.first().map_or(0, Vec::len);
        return Err(FilterError::TransitionDimMismatch {
            expected: n_states,
            found: (rows.len(), cols),
        });
    }
    let mut matrix = Array2::zeros((n_states, n_states));
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_states {
            return Err(FilterError::RaggedTransitionRow {
                row: i,
                expected: n_states,
                found: row.len(),
            });
        }
        for (j, &value) in row.iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    Ok(matrix)
}
