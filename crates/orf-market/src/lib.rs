//! # orf-market
//!
//! Market-data collaborators of the pricing engines: yield curves and
//! volatility term structures built from piecewise-constant forward
//! quantities.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Yield term structures.
pub mod yield_curve;

/// Volatility term structures.
pub mod volatility;

pub use volatility::{VolCurveInput, VolTermStructure, VolatilityCurve};
pub use yield_curve::{YieldCurve, YieldCurveInput, YieldTermStructure};
