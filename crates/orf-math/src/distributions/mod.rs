//! Probability distributions.
//!
//! Only the Gaussian is needed by the pricing code; the error function comes
//! from the `statrs` crate.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
