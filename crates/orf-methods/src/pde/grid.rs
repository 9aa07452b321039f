//! The discretized spatial axis of one factor.

use super::coordinate_change::{CoordinateChange, LocalCoefficients, LogChange};
use orf_core::{errors::Result, Real};
use std::sync::Arc;
use tracing::debug;

/// One grid axis: `N` interior nodes plus two boundary nodes, uniform in the
/// diffused coordinate.
///
/// Levels are fixed once the axis is built; the per-node drift, variance and
/// vol buffers (length `N`, interior nodes only) are refreshed every step.
#[derive(Debug, Clone)]
pub struct GridAxis {
    n_nodes: usize,
    x_min: Real,
    x_max: Real,
    dx: Real,
    x_levels: Vec<Real>,
    s_levels: Vec<Real>,
    drifts: Vec<Real>,
    variances: Vec<Real>,
    vols: Vec<Real>,
    coordinate_change: Arc<dyn CoordinateChange>,
}

impl GridAxis {
    /// Build an axis of `n_nodes` interior nodes on `[x_min, x_max]`
    /// (diffused coordinates), shifted so that a node falls exactly on the
    /// real level `align_to`.
    ///
    /// The shift is the distance from `align_to` to the nearest node of the
    /// infinite lattice `x_min + k·dx`, so it never exceeds `dx/2`; spacing
    /// and node count are unchanged.
    ///
    /// # Errors
    /// `InvalidArgument` for zero nodes or an alignment level with no
    /// diffused image; `Precondition` for empty or non-finite bounds.
    pub fn build(
        coordinate_change: Arc<dyn CoordinateChange>,
        n_nodes: usize,
        x_min: Real,
        x_max: Real,
        align_to: Real,
    ) -> Result<Self> {
        orf_core::ensure_arg!(n_nodes > 0, "the number of spot nodes must be positive");
        orf_core::ensure!(
            x_min.is_finite() && x_max.is_finite() && x_min < x_max,
            "degenerate grid bounds [{x_min}, {x_max}]"
        );
        let dx = (x_max - x_min) / (n_nodes + 1) as Real;

        let target = coordinate_change.to_diffused(align_to);
        orf_core::ensure_arg!(
            target.is_finite(),
            "cannot align the grid to {align_to}: no diffused image"
        );
        let k = ((target - x_min) / dx + 0.5).floor();
        let shift = x_min + k * dx - target;
        let (x_min, x_max) = (x_min - shift, x_max - shift);

        let x_levels: Vec<Real> = (0..n_nodes + 2).map(|j| x_min + j as Real * dx).collect();
        let s_levels = x_levels.iter().map(|&x| coordinate_change.to_real(x)).collect();
        debug!(n_nodes, x_min, x_max, dx, shift, align_to, "grid axis built");

        Ok(Self {
            n_nodes,
            x_min,
            x_max,
            dx,
            x_levels,
            s_levels,
            drifts: vec![0.0; n_nodes],
            variances: vec![0.0; n_nodes],
            vols: vec![0.0; n_nodes],
            coordinate_change,
        })
    }

    /// Same as [`build`](Self::build) with a logarithmic coordinate change.
    pub fn log(n_nodes: usize, x_min: Real, x_max: Real, align_to: Real) -> Result<Self> {
        Self::build(Arc::new(LogChange), n_nodes, x_min, x_max, align_to)
    }

    /// Number of interior nodes `N`.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Lower bound (diffused), i.e. the level of boundary node 0.
    pub fn x_min(&self) -> Real {
        self.x_min
    }

    /// Upper bound (diffused), i.e. the level of boundary node `N + 1`.
    pub fn x_max(&self) -> Real {
        self.x_max
    }

    /// Node spacing (diffused).
    pub fn dx(&self) -> Real {
        self.dx
    }

    /// `N + 2` diffused levels.
    pub fn diffused_levels(&self) -> &[Real] {
        &self.x_levels
    }

    /// `N + 2` real levels.
    pub fn real_levels(&self) -> &[Real] {
        &self.s_levels
    }

    /// Per-node drifts (interior nodes).
    pub fn drifts(&self) -> &[Real] {
        &self.drifts
    }

    /// Per-node variances (interior nodes).
    pub fn variances(&self) -> &[Real] {
        &self.variances
    }

    /// Per-node vols (interior nodes).
    pub fn vols(&self) -> &[Real] {
        &self.vols
    }

    /// The coordinate change of this axis.
    pub fn coordinate_change(&self) -> &Arc<dyn CoordinateChange> {
        &self.coordinate_change
    }

    /// Store the coefficients of interior node `i` (0-based, i.e. grid node
    /// `i + 1`).
    pub fn set_coefficients(&mut self, i: usize, c: LocalCoefficients) {
        self.drifts[i] = c.drift;
        self.variances[i] = c.variance;
        self.vols[i] = c.vol;
    }

    /// Real levels rebuilt from the bounds and spacing.
    pub fn spot_axis(&self) -> Vec<Real> {
        (0..self.n_nodes + 2)
            .map(|j| self.coordinate_change.to_real(self.x_min + j as Real * self.dx))
            .collect()
    }
}
