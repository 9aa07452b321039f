//! # orf-math
//!
//! Mathematical utilities: linear interpolation with flat extrapolation,
//! right-continuous piecewise-constant functions, and the normal
//! distribution (via statrs).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// 1D interpolation schemes.
pub mod interpolations;

/// Piecewise-constant functions with exact integrals.
pub mod piecewise_constant;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use interpolations::{Interpolation1D, LinearInterpolation};
pub use piecewise_constant::PiecewiseConstant;
