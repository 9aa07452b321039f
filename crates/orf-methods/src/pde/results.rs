//! Output of a PDE solve.

use super::grid::GridAxis;
use nalgebra::DMatrix;
use orf_core::{errors::Result, Error, Real, Time};

/// Prices per layer and, when requested, every time-step snapshot.
///
/// Snapshots are stored in increasing time order. Each is an
/// `(N + 2) × n_layers` matrix of node values.
#[derive(Debug, Clone, Default)]
pub struct PdeResults {
    /// Price of each layer at the spot, at t = 0.
    pub prices: Vec<Real>,
    /// Time of each stored snapshot.
    pub times: Vec<Time>,
    /// One grid axis per factor.
    pub grid_axes: Vec<GridAxis>,
    /// Stored snapshots; empty unless the full grid was requested.
    pub values: Vec<DMatrix<Real>>,
}

impl PdeResults {
    /// Price of the first layer.
    pub fn price(&self) -> Option<Real> {
        self.prices.first().copied()
    }

    /// Number of diffused factors.
    pub fn n_factors(&self) -> usize {
        self.grid_axes.len()
    }

    /// Whether snapshots were stored.
    pub fn has_full_grid(&self) -> bool {
        !self.values.is_empty()
    }

    /// Real levels of every node of factor `asset`, boundary nodes included.
    pub fn spot_axis(&self, asset: usize) -> Result<Vec<Real>> {
        self.grid_axes
            .get(asset)
            .map(GridAxis::spot_axis)
            .ok_or(Error::IndexOutOfRange {
                index: asset,
                size: self.grid_axes.len(),
            })
    }

    /// `(times, spot axis, values)` for one layer, with one row per stored
    /// time step and one column per node.
    ///
    /// # Errors
    /// `Precondition` if no snapshots were stored; `IndexOutOfRange` for an
    /// unknown layer.
    pub fn layer_values(&self, layer: usize) -> Result<(Vec<Time>, Vec<Real>, DMatrix<Real>)> {
        orf_core::ensure!(
            self.has_full_grid(),
            "grid values were not stored; request the full grid before solving"
        );
        let n_layers = self.values[0].ncols();
        if layer >= n_layers {
            return Err(Error::IndexOutOfRange {
                index: layer,
                size: n_layers,
            });
        }
        let axis = self.spot_axis(0)?;
        let n_nodes = self.values[0].nrows();
        let m = DMatrix::from_fn(self.values.len(), n_nodes, |i, j| self.values[i][(j, layer)]);
        Ok((self.times.clone(), axis, m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results_with(values: Vec<DMatrix<Real>>) -> PdeResults {
        let axis = GridAxis::log(3, -1.0, 1.0, 1.0).unwrap();
        PdeResults {
            prices: vec![2.5],
            times: (0..values.len()).map(|i| i as Time * 0.5).collect(),
            grid_axes: vec![axis],
            values,
        }
    }

    #[test]
    fn price_and_axes() {
        let r = results_with(vec![]);
        assert_eq!(r.price(), Some(2.5));
        assert_eq!(r.n_factors(), 1);
        assert_eq!(r.spot_axis(0).unwrap().len(), 5);
        assert!(matches!(r.spot_axis(1), Err(Error::IndexOutOfRange { index: 1, size: 1 })));
        assert!(PdeResults::default().price().is_none());
    }

    #[test]
    fn layer_values_transposes_snapshots() {
        let snap = |k: Real| DMatrix::from_fn(5, 2, |i, j| k + i as Real + 10.0 * j as Real);
        let r = results_with(vec![snap(0.0), snap(100.0)]);
        let (times, axis, m) = r.layer_values(1).unwrap();
        assert_eq!(times, vec![0.0, 0.5]);
        assert_eq!(axis.len(), 5);
        assert_eq!(m.shape(), (2, 5));
        assert_eq!(m[(0, 3)], 13.0);
        assert_eq!(m[(1, 0)], 110.0);
        assert!(matches!(r.layer_values(2), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn layer_values_needs_snapshots() {
        assert!(matches!(
            results_with(vec![]).layer_values(0),
            Err(Error::Precondition(_))
        ));
    }
}
