//! Finite-difference solution of the pricing PDE.
//!
//! * [`tridiagonal`] — banded operators, boundary conditions, the banded solve
//! * [`differential`] — first- and second-derivative operators
//! * [`coordinate_change`] — real ↔ diffused coordinate transforms
//! * [`grid`] — the aligned spatial axis of one factor
//! * [`params`] — solve configuration
//! * [`engine`] — the backward-induction driver
//! * [`solver1d`] — the single-factor solver
//! * [`results`] — prices and grid snapshots

pub mod coordinate_change;
pub mod differential;
pub mod engine;
pub mod grid;
pub mod params;
pub mod results;
pub mod solver1d;
pub mod tridiagonal;

pub use coordinate_change::{CoordinateChange, IdentityChange, LocalCoefficients, LogChange, NodeStep};
pub use differential::{delta_operator, gamma_operator};
pub use engine::{EngineState, PdeEngine, PdeLayers, PdeState, Underlying};
pub use grid::GridAxis;
pub use params::PdeParams;
pub use results::PdeResults;
pub use solver1d::{OneFactorLayers, Pde1DSolver};
pub use tridiagonal::{
    adjust_ops_for_boundary_conditions, apply_boundary_conditions, BoundaryCondition,
    GhostWeights, TridiagonalOperator,
};
