//! # orf-methods
//!
//! Numerical methods for pricing: a finite-difference PDE engine that
//! steps a product backwards on a one-dimensional grid.
//!
//! # Modules
//!
//! * [`pde`] — tridiagonal operators, coordinate changes, grids, the
//!   backward-induction engine and the 1-D solver

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite-difference PDE methods.
pub mod pde;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use pde::{
    BoundaryCondition, EngineState, GridAxis, Pde1DSolver, PdeEngine, PdeParams, PdeResults,
    TridiagonalOperator,
};
