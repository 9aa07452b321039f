//! # orf-products
//!
//! Contract models priced by the numerical methods: the [`Product`] trait
//! with its default time-partition algorithm, and European, American and
//! discretely monitored knock-out calls and puts.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Call/put flag.
pub mod option_type;

/// The `Product` trait and the time partition.
pub mod product;

/// European call/put.
pub mod european;

/// American call/put.
pub mod american;

/// Knock-out barrier call/put.
pub mod barrier;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use american::AmericanCallPut;
pub use barrier::{BarrierCallPut, BarrierDirection, MonitoringFrequency};
pub use european::EuropeanCallPut;
pub use option_type::OptionType;
pub use product::{validate_schedule, Product, TimePartition};
