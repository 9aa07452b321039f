//! # orf-pricers
//!
//! Pricing entry points: the closed-form Black–Scholes reference and PDE
//! prices of European, American and discretely monitored barrier options.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Closed-form Black–Scholes.
pub mod analytic;

/// PDE pricing functions.
pub mod pde;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use analytic::{euro_bs, BsResult};
pub use pde::{amer_bs_pde, barrier_bs_pde, euro_bs_pde, BarrierKind, BsMarket};
