//! # orflib
//!
//! Finite-difference PDE pricing of path- and state-dependent contracts.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on it rather than on the individual
//! `orf-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use orflib::market::{VolatilityCurve, YieldCurve};
//! use orflib::methods::PdeParams;
//! use orflib::pricers::{euro_bs, euro_bs_pde, BsMarket};
//! use orflib::products::OptionType;
//!
//! let market = BsMarket::new(
//!     100.0,
//!     Arc::new(YieldCurve::flat(0.05).unwrap()),
//!     0.0,
//!     Arc::new(VolatilityCurve::flat(0.2).unwrap()),
//! );
//! let params = PdeParams::from_pairs([("NTIMESTEPS", "100"), ("NSPOTNODES", "50")]).unwrap();
//!
//! let pde = euro_bs_pde(OptionType::Call, 100.0, 1.0, &market, &params).unwrap();
//! let exact = euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap();
//! assert!((pde.price().unwrap() - exact.price).abs() < 0.05);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use orf_core as core;

/// Interpolation, piecewise-constant functions, normal distribution.
pub use orf_math as math;

/// Yield curves and volatility term structures.
pub use orf_market as market;

/// Contract models.
pub use orf_products as products;

/// The finite-difference PDE engine.
pub use orf_methods as methods;

/// Closed-form and PDE pricing functions.
pub use orf_pricers as pricers;
