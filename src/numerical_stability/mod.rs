//! numerical_stability — guarded probability transforms.
//!
//! Purpose
//! -------
//! Centralize the small set of numeric maps that turn raw non-negative
//! weights or real-valued scores into probability vectors, so that the chain
//! filter and the resilience rule share one definition of "normalize" and
//! one definition of "softmax".
//!
//! Key behaviors
//! -------------
//! - `normalize_or_uniform` rescales a weight vector to unit mass and falls
//!   back to the uniform distribution when the mass is zero, reporting the
//!   fallback through its return value.
//! - `stable_softmax` applies a max-shifted softmax so that large or equal
//!   scores never overflow or divide by zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; negativity and finiteness are validated upstream in
//!   the `filtering` and `resilience` layers.
//! - Every vector returned here is non-negative and sums to one within
//!   [`PROB_TOL`] unless it is empty.
//!
//! Conventions
//! -----------
//! - Routines operate on `ndarray::Array1<f64>` and never log or touch global
//!   state; reporting degenerate cases is the caller's job.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{PROB_TOL, normalize_or_uniform, stable_softmax, uniform};
