//! The single-factor PDE solver.
//!
//! [`OneFactorLayers`] holds the value functions on one grid axis and
//! advances them with the θ-scheme
//!
//! ```text
//! E = I + (1 − θ)(Δ + Γ),   M = I − θ(Δ + Γ),   v ← M⁻¹ (E · v)
//! ```
//!
//! [`Pde1DSolver`] wires it to a [`PdeEngine`] for a one-factor product.

use super::coordinate_change::{CoordinateChange, LogChange};
use super::engine::{EngineState, PdeEngine, PdeLayers, PdeState, Underlying};
use super::params::PdeParams;
use super::results::PdeResults;
use super::tridiagonal::{
    adjust_ops_for_boundary_conditions, apply_boundary_conditions, TridiagonalOperator,
};
use nalgebra::DMatrix;
use orf_core::{errors::Result, DiscountFactor, Real, Time};
use orf_market::{VolTermStructure, YieldTermStructure};
use orf_math::{Interpolation1D, LinearInterpolation};
use orf_products::Product;
use std::sync::Arc;

/// Number of value functions solved on the same grid.
const N_LAYERS: usize = 1;

/// Value storage and step solve for one diffused factor.
///
/// Two value buffers are used alternately: the explicit operator maps the
/// current one into the other, which is then solved in place and becomes
/// current. Operators are rebuilt every step into preallocated storage.
#[derive(Debug, Clone)]
pub struct OneFactorLayers {
    buffers: [DMatrix<Real>; 2],
    current: usize,
    explicit: TridiagonalOperator,
    implicit: TridiagonalOperator,
    delta: TridiagonalOperator,
    gamma: TridiagonalOperator,
    times: Vec<Time>,
    snapshots: Vec<DMatrix<Real>>,
}

impl Default for OneFactorLayers {
    fn default() -> Self {
        Self::new()
    }
}

impl OneFactorLayers {
    /// Empty layers; sized by [`PdeLayers::init_layers`].
    pub fn new() -> Self {
        Self {
            buffers: [DMatrix::zeros(0, 0), DMatrix::zeros(0, 0)],
            current: 0,
            explicit: TridiagonalOperator::new(0),
            implicit: TridiagonalOperator::new(0),
            delta: TridiagonalOperator::new(0),
            gamma: TridiagonalOperator::new(0),
            times: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// The current value layers, one column per layer.
    pub fn values(&self) -> &DMatrix<Real> {
        &self.buffers[self.current]
    }

    fn build_operators(&mut self, state: &PdeState, dt: Time) -> Result<()> {
        let axis = &state.grid_axes[0];
        let (n, dx, theta) = (axis.n_nodes(), axis.dx(), state.theta);

        self.delta.set_delta(axis.drifts(), dt, dx, 1.0 - theta);
        self.gamma.set_gamma(axis.variances(), dt, dx, 1.0 - theta);
        self.explicit.set_identity(n);
        self.explicit += &self.delta;
        self.explicit += &self.gamma;

        self.delta.set_delta(axis.drifts(), dt, dx, theta);
        self.gamma.set_gamma(axis.variances(), dt, dx, theta);
        self.implicit.set_identity(n);
        self.implicit -= &self.delta;
        self.implicit -= &self.gamma;

        adjust_ops_for_boundary_conditions(
            &mut self.explicit,
            &mut self.implicit,
            state.boundary_condition,
            axis.coordinate_change().zero_curvature_weights(dx),
        )
    }
}

impl PdeLayers for OneFactorLayers {
    fn init_layers(&mut self, state: &PdeState) -> Result<()> {
        orf_core::ensure!(
            state.grid_axes.len() == 1,
            "the 1-D solver handles one factor only, got {}",
            state.grid_axes.len()
        );
        let rows = state.grid_axes[0].n_nodes() + 2;
        let n_steps = state.partition.len();
        self.buffers = [DMatrix::zeros(rows, N_LAYERS), DMatrix::zeros(rows, N_LAYERS)];
        self.current = 0;
        self.times = vec![0.0; n_steps];
        self.snapshots = if state.store_full_grid {
            vec![DMatrix::zeros(rows, N_LAYERS); n_steps]
        } else {
            Vec::new()
        };
        Ok(())
    }

    fn solve_step(&mut self, state: &PdeState, _step: usize, dt: Time) -> Result<()> {
        self.build_operators(state, dt)?;

        let [a, b] = &mut self.buffers;
        let (src, dst) = if self.current == 0 { (a, b) } else { (b, a) };
        let rows = src.nrows();
        for j in 0..src.ncols() {
            let x = &src.as_slice()[j * rows..(j + 1) * rows];
            let y = &mut dst.as_mut_slice()[j * rows..(j + 1) * rows];
            self.explicit.apply(x, y);
            self.implicit.apply_inverse_in_place(y);
            apply_boundary_conditions(y);
        }
        self.current ^= 1;
        Ok(())
    }

    fn discount(&mut self, df: DiscountFactor) {
        self.buffers[self.current] *= df;
    }

    fn eval_product(&mut self, state: &PdeState, product: &dyn Product, step: usize) -> Result<()> {
        if let Some(k) = state.partition.events[step] {
            let levels = state.grid_axes[0].real_levels();
            let v = &mut self.buffers[self.current];
            for (node, &s) in levels.iter().enumerate() {
                for j in 0..v.ncols() {
                    v[(node, j)] = product.eval_at_step(k, &[s], v[(node, j)])?;
                }
            }
        }
        self.times[step] = state.partition.times[step];
        if state.store_full_grid {
            self.snapshots[step].copy_from(&self.buffers[self.current]);
        }
        Ok(())
    }

    fn store_results(&mut self, state: &PdeState, spots: &[Real]) -> Result<PdeResults> {
        let axis = &state.grid_axes[0];
        let x0 = axis.coordinate_change().to_diffused(spots[0]);
        let v = &self.buffers[self.current];
        let prices = (0..v.ncols())
            .map(|j| {
                let column: Vec<Real> = v.column(j).iter().copied().collect();
                LinearInterpolation::new(axis.diffused_levels(), &column).map(|f| f.operator(x0))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PdeResults {
            prices,
            times: std::mem::take(&mut self.times),
            grid_axes: state.grid_axes.clone(),
            values: std::mem::take(&mut self.snapshots),
        })
    }
}

/// PDE solver for a product on a single underlying.
///
/// The discount curve also drives the drift of the underlying; the grid is
/// logarithmic unless another coordinate change is supplied.
///
/// ```
/// use std::sync::Arc;
/// use orf_market::{VolatilityCurve, YieldCurve};
/// use orf_methods::pde::{Pde1DSolver, PdeParams};
/// use orf_products::{EuropeanCallPut, OptionType};
///
/// let product = Arc::new(EuropeanCallPut::new(OptionType::Call, 100.0, 1.0).unwrap());
/// let curve = Arc::new(YieldCurve::flat(0.05).unwrap());
/// let vol = Arc::new(VolatilityCurve::flat(0.2).unwrap());
/// let mut solver = Pde1DSolver::new(product, curve, 100.0, 0.0, vol).unwrap();
///
/// let mut params = PdeParams::default();
/// params.n_time_steps = 100;
/// params.n_spot_nodes = vec![50];
/// let price = solver.solve(&params).unwrap().price().unwrap();
/// assert!((price - 10.45).abs() < 0.05);
/// ```
#[derive(Debug)]
pub struct Pde1DSolver {
    engine: PdeEngine<OneFactorLayers>,
}

impl Pde1DSolver {
    /// Create a solver for `product` on an underlying at `spot` with a
    /// continuous dividend yield.
    ///
    /// # Errors
    /// `InvalidArgument` if the product has more than one factor or the
    /// spot is not positive.
    pub fn new(
        product: Arc<dyn Product>,
        discount_curve: Arc<dyn YieldTermStructure>,
        spot: Real,
        div_yield: Real,
        vol: Arc<dyn VolTermStructure>,
    ) -> Result<Self> {
        orf_core::ensure_arg!(
            product.n_factors() == 1,
            "the 1-D solver handles one factor only, the product has {}",
            product.n_factors()
        );
        let underlying = Underlying {
            spot,
            accrual_curve: Arc::clone(&discount_curve),
            div_yield,
            vol,
            barrier: None,
            coordinate_change: Arc::new(LogChange),
        };
        let engine = PdeEngine::new(product, discount_curve, vec![underlying], OneFactorLayers::new())?;
        Ok(Self { engine })
    }

    /// Set the barrier level used when the grid is aligned to the barrier.
    pub fn with_barrier(mut self, barrier: Real) -> Result<Self> {
        orf_core::ensure_arg!(barrier > 0.0, "the barrier must be positive, got {barrier}");
        self.engine.underlyings_mut()[0].barrier = Some(barrier);
        Ok(self)
    }

    /// Replace the default logarithmic coordinate change.
    pub fn with_coordinate_change(mut self, change: Arc<dyn CoordinateChange>) -> Self {
        self.engine.underlyings_mut()[0].coordinate_change = change;
        self
    }

    /// Life-cycle state of the underlying engine.
    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Price the product.
    pub fn solve(&mut self, params: &PdeParams) -> Result<PdeResults> {
        self.engine.solve(params)
    }
}
