//! Probability-vector transforms.
//!
//! Provides the two normalizing maps the filtering and resilience layers rely
//! on, written so that degenerate inputs never produce NaN:
//!
//! # Provided items
//! - [`PROB_TOL`]: tolerance used when comparing probability sums against 1.
//! - [`normalize_or_uniform`]: in-place, overflow-safe rescaling to unit mass,
//!   with a uniform fallback when the mass is exactly zero.
//! - [`uniform`]: the uniform distribution over `n` states.
//! - [`stable_softmax`]: max-shifted softmax over a slice of scores.
use ndarray::Array1;

/// Tolerance for "sums to one" checks on posterior and likelihood vectors.
pub const PROB_TOL: f64 = 1e-9;

/// Uniform distribution over `n` states.
///
/// # Panics
/// Never panics; `n == 0` yields an empty vector. Callers construct state
/// spaces through validated constructors, so `n >= 1` in practice.
pub fn uniform(n: usize) -> Array1<f64> {
    if n == 0 {
        return Array1::zeros(0);
    }
    Array1::from_elem(n, 1.0 / n as f64)
}

/// Rescale `vec` in place so that its entries sum to one.
///
/// Entries are first divided by the largest entry and only then summed, so
/// finite weights whose plain sum would overflow (e.g. several `1e308`s)
/// still normalize exactly. If no entry is strictly positive and finite the
/// vector is overwritten with the uniform distribution.
///
/// # Parameters
/// - `vec`: non-negative weights, typically an element-wise product of a
///   likelihood and a predicted belief.
///
/// # Returns
/// `true` if the uniform fallback was taken, `false` if the vector was
/// rescaled normally. Callers use the flag to report degenerate stages.
pub fn normalize_or_uniform(vec: &mut Array1<f64>) -> bool {
    let max = vec.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 && max.is_finite() {
        vec.mapv_inplace(|x| x / max);
        // Each entry is now in [0, 1] and the largest is exactly 1.
        let total: f64 = vec.sum();
        vec.mapv_inplace(|x| x / total);
        false
    } else {
        let n = vec.len();
        vec.assign(&uniform(n));
        true
    }
}

/// Numerically stable softmax: `exp(s_i - max s) / Σ_j exp(s_j - max s)`.
///
/// Subtracting the maximum keeps every exponent `<= 0`, so large scores never
/// overflow and at least one term equals 1, so the denominator is never 0.
///
/// # Parameters
/// - `scores`: finite real scores. An empty slice yields an empty vector.
///
/// # Returns
/// A probability vector of the same length as `scores`.
pub fn stable_softmax(scores: &[f64]) -> Array1<f64> {
    if scores.is_empty() {
        return Array1::zeros(0);
    }
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut exps: Array1<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let denom: f64 = exps.sum();
    exps.mapv_inplace(|e| e / denom);
    exps
}
